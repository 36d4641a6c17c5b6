mod support;

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parasite_atlas::map::{
    ClusterRenderer, DisplayMode, GridClusterer, MapProjector, MarkerId, MotionPhase,
    Selection, SelectionStore, SpreadLayoutEngine,
};
use parasite_atlas::observations::{DocumentId, Observation};
use parasite_atlas::settings::{GridSettings, MapSettings, SpreadSettings};
use support::fixtures::{in_document, observation, oyster_bed, scatter};
use support::projector::LinearProjector;
use support::surface::{RecordingSurface, SurfaceEvent};

struct Harness {
    renderer: ClusterRenderer,
    store: Rc<RefCell<SelectionStore>>,
    surface: RecordingSurface,
    projector: LinearProjector,
    t0: Instant,
}

impl Harness {
    fn new(observations: Vec<Observation>, mode: DisplayMode) -> Self {
        Self::with_settings(observations, mode, MapSettings::default())
    }

    fn with_settings(
        observations: Vec<Observation>,
        mode: DisplayMode,
        settings: MapSettings,
    ) -> Self {
        let store = Rc::new(RefCell::new(SelectionStore::new(mode)));
        let mut renderer =
            ClusterRenderer::new(settings, Rc::clone(&store)).expect("valid settings");
        renderer.set_observations(observations);
        let mut harness = Self {
            renderer,
            store,
            surface: RecordingSurface::default(),
            projector: LinearProjector::new(10.0),
            t0: Instant::now(),
        };
        assert!(harness.sync());
        harness
    }

    fn sync(&mut self) -> bool {
        self.renderer.sync(&self.projector, &mut self.surface)
    }

    fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }

    fn tick(&mut self, ms: u64) -> bool {
        let now = self.at(ms);
        self.renderer.tick(&mut self.surface, now)
    }

    fn enter(&mut self, marker: MarkerId, ms: u64) -> bool {
        let now = self.at(ms);
        self.renderer.pointer_entered(marker, now)
    }

    fn leave(&mut self, marker: MarkerId, ms: u64) {
        let now = self.at(ms);
        self.renderer.pointer_left(marker, now);
    }

    fn markers(&self, cluster: usize) -> Vec<MarkerId> {
        self.renderer.clusters()[cluster]
            .markers()
            .iter()
            .flat_map(|member| member.ids())
            .collect()
    }

    fn phase(&self, cluster: usize) -> MotionPhase {
        self.renderer.clusters()[cluster].motion().phase()
    }

    fn select(&mut self, selection: Selection) {
        self.store.borrow_mut().set_selection(selection);
    }

    fn assert_collapsed_on_surface(&self, cluster: usize) {
        let center = self.renderer.clusters()[cluster].definition().center;
        for id in self.markers(cluster) {
            assert_eq!(self.surface.position(id), center);
        }
    }

    fn assert_expanded_on_surface(&self, cluster: usize) {
        let live = &self.renderer.clusters()[cluster];
        for (member, markers) in live.definition().members.iter().zip(live.markers()) {
            for id in markers.ids() {
                assert_eq!(self.surface.position(id), member.spread);
            }
        }
    }
}

fn arcs(observations: Vec<Observation>) -> Vec<Arc<Observation>> {
    observations.into_iter().map(Arc::new).collect()
}

#[test]
fn two_close_points_share_one_cluster_with_mean_centroid() {
    let clusterer = GridClusterer::new(GridSettings { precision: 3 }).unwrap();
    let buckets = clusterer.bucket(&arcs(vec![
        observation("Anisakis simplex", "Gadus morhua", 10.0001, 20.0001),
        observation("Anisakis simplex", "Merluccius merluccius", 10.0002, 20.0002),
    ]));
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].observations.len(), 2);
    assert!((buckets[0].center.lat - 10.00015).abs() < 1e-9);
    assert!((buckets[0].center.lng - 20.00015).abs() < 1e-9);
}

#[test]
fn centroid_is_raw_mean_at_any_precision() {
    let observations = arcs(oyster_bed());
    let lat = observations.iter().map(|o| o.latitude.unwrap()).sum::<f64>() / 4.0;
    let lng = observations.iter().map(|o| o.longitude.unwrap()).sum::<f64>() / 4.0;
    for precision in [0, 1, 2, 3] {
        let clusterer = GridClusterer::new(GridSettings { precision }).unwrap();
        let buckets = clusterer.bucket(&observations);
        assert_eq!(buckets.len(), 1, "precision {precision}");
        assert!((buckets[0].center.lat - lat).abs() < 1e-12);
        assert!((buckets[0].center.lng - lng).abs() < 1e-12);
    }
}

#[test]
fn second_ring_sits_strictly_further_out() {
    let settings = MapSettings {
        spread: SpreadSettings {
            ring_capacity: 3,
            ..SpreadSettings::default()
        },
        ..MapSettings::default()
    };
    let mut five = oyster_bed();
    five.push(observation("Haplosporidium nelsoni", "Crassostrea virginica", 44.6600, -1.1700));
    let harness = Harness::with_settings(five, DisplayMode::Parasite, settings);
    let live = &harness.renderer.clusters()[0];
    let projector = harness.projector;
    let origin = projector.project(live.definition().center);
    let distances: Vec<f64> = live
        .definition()
        .members
        .iter()
        .map(|member| {
            let pixel = projector.project(member.spread);
            (pixel.x - origin.x).hypot(pixel.y - origin.y)
        })
        .collect();
    let inner_max = distances[..3].iter().cloned().fold(f64::MIN, f64::max);
    let outer_min = distances[3..].iter().cloned().fold(f64::MAX, f64::min);
    assert!(outer_min > inner_max, "{distances:?}");
}

#[test]
fn selecting_one_member_pins_cluster_open_without_hover() {
    let mut harness = Harness::new(oyster_bed(), DisplayMode::Both);
    harness.select(Selection::Parasite("Perkinsus olseni".into()));
    assert!(harness.sync());

    let live = &harness.renderer.clusters()[0];
    assert!(live.is_pinned());
    assert_eq!(live.motion().phase(), MotionPhase::Expanded);
    assert_eq!(live.guides().len(), 4);
    harness.assert_expanded_on_surface(0);

    let other = harness.markers(0)[0];
    harness.enter(other, 0);
    harness.leave(other, 10);
    for ms in (20..2_000).step_by(40) {
        harness.tick(ms);
    }
    assert_eq!(harness.phase(0), MotionPhase::Expanded);
    assert_eq!(harness.surface.guides.len(), 4);
    harness.assert_expanded_on_surface(0);
}

#[test]
fn selecting_a_paper_pins_the_cluster_holding_one_of_its_records() {
    let mut observations = oyster_bed();
    let cited = observations.remove(2);
    observations.insert(2, in_document(cited, 7));
    let mut harness = Harness::new(observations, DisplayMode::Both);

    harness.select(Selection::Document(DocumentId(8)));
    assert!(harness.sync());
    assert!(!harness.renderer.clusters()[0].is_pinned());
    assert_eq!(harness.phase(0), MotionPhase::Collapsed);
    harness.assert_collapsed_on_surface(0);

    harness.select(Selection::Document(DocumentId(7)));
    assert!(harness.sync());
    let live = &harness.renderer.clusters()[0];
    assert!(live.is_pinned());
    assert_eq!(live.motion().phase(), MotionPhase::Expanded);
    assert_eq!(live.guides().len(), 4);
    harness.assert_expanded_on_surface(0);

    let marker = harness.markers(0)[0];
    harness.enter(marker, 0);
    harness.leave(marker, 10);
    harness.tick(1_000);
    assert_eq!(harness.phase(0), MotionPhase::Expanded);
}

#[test]
fn quick_leave_and_return_never_collapses() {
    let mut harness = Harness::new(oyster_bed(), DisplayMode::Parasite);
    let markers = harness.markers(0);
    assert!(harness.enter(markers[0], 0));
    assert!(!harness.tick(300));
    harness.assert_expanded_on_surface(0);
    harness.surface.take_events();

    harness.leave(markers[0], 300);
    assert!(harness.tick(340));
    assert!(!harness.enter(markers[1], 360));
    for ms in (380..1_500).step_by(20) {
        harness.tick(ms);
        assert_eq!(harness.phase(0), MotionPhase::Expanded);
    }
    assert_eq!(harness.surface.moves(), 0);
    harness.assert_expanded_on_surface(0);
}

#[test]
fn hover_out_collapses_after_delay() {
    let mut harness = Harness::new(oyster_bed(), DisplayMode::Parasite);
    let marker = harness.markers(0)[2];
    harness.enter(marker, 0);
    harness.tick(400);
    harness.leave(marker, 400);
    harness.tick(519);
    assert_eq!(harness.phase(0), MotionPhase::Expanded);
    harness.tick(520);
    assert_eq!(harness.phase(0), MotionPhase::Collapsing);
    assert!(!harness.tick(900));
    assert_eq!(harness.phase(0), MotionPhase::Collapsed);
    assert!(harness.surface.guides.is_empty());
    harness.assert_collapsed_on_surface(0);
}

#[test]
fn pinned_clusters_stay_open_across_rebuilds_until_cleared() {
    let mut observations = oyster_bed();
    observations.push(observation("Bonamia ostreae", "Ostrea edulis", 51.5, -4.1));
    let mut harness = Harness::new(observations, DisplayMode::Both);
    harness.select(Selection::Parasite("bonamia ostreae".into()));
    harness.sync();

    for (step, zoom) in [9.0, 11.0, 12.5, 10.0].into_iter().enumerate() {
        harness.projector = LinearProjector::new(zoom);
        assert!(harness.sync());
        let base = step as u64 * 1_000;
        let marker = harness.markers(0)[0];
        harness.leave(marker, base);
        harness.tick(base + 500);
        assert!(harness.renderer.clusters()[0].is_pinned());
        assert_eq!(harness.phase(0), MotionPhase::Expanded);
        harness.assert_expanded_on_surface(0);
        assert!(!harness.renderer.clusters()[1].is_pinned());
    }

    harness.store.borrow_mut().clear_selection();
    assert!(harness.sync());
    assert_eq!(harness.phase(0), MotionPhase::Collapsed);
    assert!(harness.surface.guides.is_empty());
    let marker = harness.markers(0)[0];
    harness.enter(marker, 10_000);
    harness.tick(10_300);
    assert_eq!(harness.phase(0), MotionPhase::Expanded);
    harness.leave(marker, 10_300);
    harness.tick(10_500);
    harness.tick(10_900);
    assert_eq!(harness.phase(0), MotionPhase::Collapsed);
}

#[test]
fn rebuild_mid_animation_leaves_no_stale_updates() {
    let mut harness = Harness::new(oyster_bed(), DisplayMode::Both);
    let old_markers = harness.markers(0);
    harness.enter(old_markers[0], 0);
    harness.tick(100);
    assert_eq!(harness.phase(0), MotionPhase::Expanding);
    let generation = harness.renderer.generation();

    harness.projector = LinearProjector::new(11.0);
    assert!(harness.sync());
    assert_eq!(harness.renderer.generation(), generation + 1);
    assert!(harness.surface.guides.is_empty());
    for id in &old_markers {
        assert!(!harness.surface.markers.contains_key(id));
    }
    harness.surface.take_events();

    assert!(!harness.tick(150));
    assert!(!harness.tick(400));
    assert!(!harness.enter(old_markers[0], 450));
    harness.leave(old_markers[1], 460);
    assert!(!harness.tick(1_000));
    assert!(harness.surface.take_events().is_empty());
    assert_eq!(harness.phase(0), MotionPhase::Collapsed);
    harness.assert_collapsed_on_surface(0);
}

#[test]
fn rebuild_drops_pending_collapse_deadlines() {
    let mut harness = Harness::new(oyster_bed(), DisplayMode::Parasite);
    let marker = harness.markers(0)[0];
    harness.enter(marker, 0);
    harness.tick(300);
    harness.leave(marker, 300);

    harness.select(Selection::Host("Crassostrea gigas".into()));
    assert!(harness.sync());
    harness.surface.take_events();
    assert!(!harness.tick(500));
    assert!(harness.surface.take_events().is_empty());
    assert_eq!(harness.phase(0), MotionPhase::Expanded);
}

#[test]
fn single_member_clusters_never_spread() {
    let mut harness = Harness::new(
        vec![observation("Gyrodactylus salaris", "Salmo salar", 63.4, 10.4)],
        DisplayMode::Both,
    );
    harness.select(Selection::Parasite("Gyrodactylus salaris".into()));
    harness.sync();
    let live = &harness.renderer.clusters()[0];
    assert!(!live.is_pinned());
    assert_eq!(live.definition().members[0].spread, live.definition().center);
    let markers = harness.markers(0);
    assert!(markers.iter().all(|id| !harness.surface.markers[id].interactive));
    assert!(!harness.enter(markers[0], 0));
    harness.leave(markers[0], 10);
    assert!(!harness.tick(500));
    assert!(harness.surface.guides.is_empty());
}

#[test]
fn every_located_observation_lands_in_exactly_one_cluster() {
    let mut observations = scatter(600, 45);
    observations.push(Observation {
        latitude: Some(12.0),
        longitude: None,
        ..observation("Orphan", "None", 0.0, 0.0)
    });
    observations.push(Observation {
        latitude: None,
        longitude: None,
        ..observation("Unplaced", "None", 0.0, 0.0)
    });
    let observations = arcs(observations);
    let clusterer = GridClusterer::new(GridSettings::default()).unwrap();
    let spread = SpreadLayoutEngine::new(SpreadSettings::default()).unwrap();
    let clusters = clusterer.build_clusters(&observations, &LinearProjector::new(8.0), &spread);
    assert_eq!(clusters.len(), 45);

    let mut seen = HashSet::new();
    for cluster in &clusters {
        assert!(!cluster.is_empty());
        for member in &cluster.members {
            assert!(seen.insert(Arc::as_ptr(&member.observation)), "member in two clusters");
        }
    }
    let located: HashSet<_> = observations
        .iter()
        .filter(|o| o.coordinates().is_some())
        .map(Arc::as_ptr)
        .collect();
    assert_eq!(seen, located);
    assert_eq!(seen.len(), 600);
}

#[test]
fn independent_renderers_agree_bit_for_bit() {
    let first = Harness::new(scatter(200, 12), DisplayMode::Parasite);
    let second = Harness::new(scatter(200, 12), DisplayMode::Parasite);
    let bits = |harness: &Harness| -> Vec<(u64, u64)> {
        harness
            .renderer
            .clusters()
            .iter()
            .flat_map(|live| live.definition().members.iter())
            .map(|member| (member.spread.lat.to_bits(), member.spread.lng.to_bits()))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn markers_are_created_at_centroid_in_role_order() {
    let mut harness = Harness::new(oyster_bed(), DisplayMode::Host);
    assert_eq!(harness.surface.markers.len(), 4);
    harness.assert_collapsed_on_surface(0);

    harness.store.borrow_mut().set_display_mode(DisplayMode::Both);
    harness.surface.take_events();
    assert!(harness.sync());
    let events = harness.surface.take_events();
    let removed = events
        .iter()
        .filter(|e| matches!(e, SurfaceEvent::RemoveMarker(_)))
        .count();
    let added: Vec<MarkerId> = events
        .iter()
        .filter_map(|e| match e {
            SurfaceEvent::AddMarker(id) => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(removed, 4);
    assert_eq!(added.len(), 8);
    let first = &harness.surface.markers[&added[0]];
    let second = &harness.surface.markers[&added[1]];
    assert!(first.style.radius > second.style.radius, "host drawn under parasite");
    harness.assert_collapsed_on_surface(0);
}
