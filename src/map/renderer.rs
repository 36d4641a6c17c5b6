//! Keeps the markers on a [`MarkerSurface`] in step with observations, zoom and selection.
//!
//! The renderer owns every live cluster outright. A rebuild first removes all
//! markers, guide lines, transitions and collapse deadlines of the previous
//! generation, so nothing from an old cluster can touch a new one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use super::animation::{AnimationController, ClusterMotion};
use super::geo::{GeoPoint, MapProjector};
use super::grid::GridClusterer;
use super::highlight::{GuideStyle, MarkerStyle, SelectionHighlighter};
use super::selection::{MarkerRole, SelectionStore};
use super::spread::SpreadLayoutEngine;
use super::ClusterDefinition;
use crate::observations::Observation;
use crate::settings::{MapSettings, SettingsError};

/// Surface-assigned handle for a point marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Surface-assigned handle for a guide line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuideId(pub u64);

/// Everything a surface needs to draw one marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSpec {
    pub position: GeoPoint,
    pub role: MarkerRole,
    pub style: MarkerStyle,
    pub tooltip: String,
    /// Whether hovering the marker should produce pointer events.
    pub interactive: bool,
}

/// Drawing target for markers and guide lines.
pub trait MarkerSurface {
    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId;
    fn move_marker(&mut self, id: MarkerId, position: GeoPoint);
    fn remove_marker(&mut self, id: MarkerId);
    fn add_guide(&mut self, from: GeoPoint, to: GeoPoint, style: GuideStyle) -> GuideId;
    fn remove_guide(&mut self, id: GuideId);
}

/// Marker handles for one cluster member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemberMarkers {
    pub parasite: Option<MarkerId>,
    pub host: Option<MarkerId>,
}

impl MemberMarkers {
    fn set(&mut self, role: MarkerRole, id: MarkerId) {
        match role {
            MarkerRole::Parasite => self.parasite = Some(id),
            MarkerRole::Host => self.host = Some(id),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.host.iter().chain(self.parasite.iter()).copied()
    }
}

/// A cluster currently shown on the surface.
#[derive(Debug)]
pub struct LiveCluster {
    definition: ClusterDefinition,
    motion: ClusterMotion,
    markers: Vec<MemberMarkers>,
    guides: Vec<GuideId>,
    pinned: bool,
}

impl LiveCluster {
    pub fn definition(&self) -> &ClusterDefinition {
        &self.definition
    }

    pub fn motion(&self) -> &ClusterMotion {
        &self.motion
    }

    pub fn markers(&self) -> &[MemberMarkers] {
        &self.markers
    }

    pub fn guides(&self) -> &[GuideId] {
        &self.guides
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    fn move_markers(&self, surface: &mut dyn MarkerSurface) {
        for (markers, position) in self.markers.iter().zip(self.motion.positions()) {
            for id in markers.ids() {
                surface.move_marker(id, *position);
            }
        }
    }

    fn show_guides(&mut self, surface: &mut dyn MarkerSurface, style: GuideStyle) {
        if !self.guides.is_empty() {
            return;
        }
        let center = self.definition.center;
        self.guides = self
            .definition
            .members
            .iter()
            .map(|member| surface.add_guide(center, member.spread, style))
            .collect();
    }

    fn hide_guides(&mut self, surface: &mut dyn MarkerSurface) {
        for id in self.guides.drain(..) {
            surface.remove_guide(id);
        }
    }

    fn remove_from(&mut self, surface: &mut dyn MarkerSurface) {
        self.hide_guides(surface);
        for markers in self.markers.drain(..) {
            for id in markers.ids() {
                surface.remove_marker(id);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BuildKey {
    data_revision: u64,
    selection_revision: u64,
    zoom_bits: u64,
}

#[derive(Clone, Copy, Debug)]
struct MarkerOwner {
    generation: u64,
    cluster: usize,
    member: usize,
    role: MarkerRole,
}

/// Orchestrates clustering, layout, animation and styling over a marker surface.
pub struct ClusterRenderer {
    clusterer: GridClusterer,
    spread: SpreadLayoutEngine,
    animation: AnimationController,
    highlighter: SelectionHighlighter,
    store: Rc<RefCell<SelectionStore>>,
    observations: Vec<Arc<Observation>>,
    data_revision: u64,
    built: Option<BuildKey>,
    generation: u64,
    clusters: Vec<LiveCluster>,
    owners: HashMap<MarkerId, MarkerOwner>,
}

impl ClusterRenderer {
    /// Build the engines from settings; invalid settings fail here.
    pub fn new(
        settings: MapSettings,
        store: Rc<RefCell<SelectionStore>>,
    ) -> Result<Self, SettingsError> {
        settings.markers.validate()?;
        Ok(Self {
            clusterer: GridClusterer::new(settings.grid)?,
            spread: SpreadLayoutEngine::new(settings.spread)?,
            animation: AnimationController::new(settings.animation)?,
            highlighter: SelectionHighlighter::new(settings.markers),
            store,
            observations: Vec::new(),
            data_revision: 0,
            built: None,
            generation: 0,
            clusters: Vec::new(),
            owners: HashMap::new(),
        })
    }

    /// Replace the observation set; the next `sync` rebuilds.
    pub fn set_observations(&mut self, observations: Vec<Observation>) {
        self.observations = observations.into_iter().map(Arc::new).collect();
        self.data_revision = self.data_revision.wrapping_add(1);
    }

    pub fn observations(&self) -> &[Arc<Observation>] {
        &self.observations
    }

    pub fn clusters(&self) -> &[LiveCluster] {
        &self.clusters
    }

    /// Incremented on every rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn store(&self) -> &Rc<RefCell<SelectionStore>> {
        &self.store
    }

    /// Rebuild when data, selection, display mode or zoom changed since the last build.
    ///
    /// Returns whether a rebuild happened.
    pub fn sync(
        &mut self,
        projector: &impl MapProjector,
        surface: &mut dyn MarkerSurface,
    ) -> bool {
        let key = BuildKey {
            data_revision: self.data_revision,
            selection_revision: self.store.borrow().revision(),
            zoom_bits: projector.zoom().to_bits(),
        };
        if self.built == Some(key) {
            return false;
        }
        self.rebuild(projector, surface);
        self.built = Some(key);
        true
    }

    fn rebuild(&mut self, projector: &impl MapProjector, surface: &mut dyn MarkerSurface) {
        self.clear(surface);
        self.generation = self.generation.wrapping_add(1);
        let (selection, mode) = {
            let store = self.store.borrow();
            (store.selection().clone(), store.display_mode())
        };
        let definitions = self
            .clusterer
            .build_clusters(&self.observations, projector, &self.spread);
        let guide_style = self.highlighter.guide_style();
        let mut marker_count = 0;
        let mut pinned_count = 0;
        for (cluster, definition) in definitions.into_iter().enumerate() {
            let interactive = definition.is_interactive();
            let mut markers = Vec::with_capacity(definition.len());
            for (member, entry) in definition.members.iter().enumerate() {
                let mut handles = MemberMarkers::default();
                for &role in mode.roles() {
                    let id = surface.add_marker(MarkerSpec {
                        position: definition.center,
                        role,
                        style: self
                            .highlighter
                            .marker_style(&entry.observation, role, &selection),
                        tooltip: entry.observation.tooltip(),
                        interactive,
                    });
                    handles.set(role, id);
                    self.owners.insert(
                        id,
                        MarkerOwner {
                            generation: self.generation,
                            cluster,
                            member,
                            role,
                        },
                    );
                    marker_count += 1;
                }
                markers.push(handles);
            }
            let pinned = self.highlighter.is_pinned(&definition, &selection);
            let motion = ClusterMotion::new(definition.center, definition.spread_positions());
            let mut live = LiveCluster {
                definition,
                motion,
                markers,
                guides: Vec::new(),
                pinned,
            };
            if pinned && self.animation.instant_expand(&mut live.motion) {
                live.move_markers(surface);
                live.show_guides(surface, guide_style);
                pinned_count += 1;
            }
            self.clusters.push(live);
        }
        tracing::debug!(
            "Rebuilt generation {}: {} clusters, {marker_count} markers, {pinned_count} pinned",
            self.generation,
            self.clusters.len(),
        );
    }

    /// Pointer entered a marker. Returns whether a cluster started expanding.
    pub fn pointer_entered(&mut self, marker: MarkerId, now: Instant) -> bool {
        let Some(index) = self.resolve(marker) else {
            return false;
        };
        let live = &mut self.clusters[index];
        self.animation.pointer_entered(&mut live.motion, now)
    }

    /// Pointer left a marker; its cluster collapses after the delay unless re-entered.
    pub fn pointer_left(&mut self, marker: MarkerId, now: Instant) {
        if let Some(index) = self.resolve(marker) {
            let live = &mut self.clusters[index];
            self.animation.pointer_left(&mut live.motion, now);
        }
    }

    /// Observation and role drawn by a live marker.
    pub fn marker_observation(&self, marker: MarkerId) -> Option<(&Observation, MarkerRole)> {
        let owner = self.live_owner(marker)?;
        let member = self
            .clusters
            .get(owner.cluster)?
            .definition
            .members
            .get(owner.member)?;
        Some((member.observation.as_ref(), owner.role))
    }

    /// Live cluster a marker of the current generation belongs to.
    pub fn marker_cluster(&self, marker: MarkerId) -> Option<&LiveCluster> {
        let owner = self.live_owner(marker)?;
        self.clusters.get(owner.cluster)
    }

    fn live_owner(&self, marker: MarkerId) -> Option<&MarkerOwner> {
        self.owners
            .get(&marker)
            .filter(|owner| owner.generation == self.generation)
    }

    fn resolve(&self, marker: MarkerId) -> Option<usize> {
        let Some(owner) = self.owners.get(&marker) else {
            tracing::trace!("Ignoring pointer event for unknown marker {marker:?}");
            return None;
        };
        if owner.generation != self.generation {
            tracing::trace!("Ignoring pointer event for stale marker {marker:?}");
            return None;
        }
        let live = self.clusters.get(owner.cluster)?;
        live.definition.is_interactive().then_some(owner.cluster)
    }

    /// Advance every live cluster to `now`.
    ///
    /// Returns whether any cluster is still animating or waiting on a collapse
    /// deadline, i.e. whether the host should schedule another frame.
    pub fn tick(&mut self, surface: &mut dyn MarkerSurface, now: Instant) -> bool {
        let guide_style = self.highlighter.guide_style();
        let mut active = false;
        for live in &mut self.clusters {
            let outcome = self.animation.tick(&mut live.motion, live.pinned, now);
            if live.motion.is_expanded() {
                live.show_guides(surface, guide_style);
            }
            if outcome.moved {
                live.move_markers(surface);
            }
            if outcome.collapse_finished {
                live.hide_guides(surface);
            }
            active |= live.motion.needs_tick();
        }
        active
    }

    /// Remove every marker and guide; the next `sync` rebuilds from scratch.
    pub fn teardown(&mut self, surface: &mut dyn MarkerSurface) {
        self.clear(surface);
        self.built = None;
    }

    fn clear(&mut self, surface: &mut dyn MarkerSurface) {
        for mut live in self.clusters.drain(..) {
            live.remove_from(surface);
        }
        self.owners.clear();
    }
}
