//! Desktop map viewer for parasite observations.

mod camera;
mod graticule;
mod marker_layer;
mod style;
mod top_bar;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

use eframe::egui;

use crate::map::{
    ClusterRenderer, DisplayMode, GeoPoint, MarkerId, MarkerRole, Selection, SelectionStore,
};
use crate::observations::{Document, DocumentId, Observation};
use crate::settings::{MapSettings, SettingsError};
use camera::MapCamera;
use marker_layer::MarkerLayer;

/// Minimum window size for the viewer.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(640.0, 420.0);
const INITIAL_ZOOM: f64 = 3.0;
const FALLBACK_CENTER: GeoPoint = GeoPoint::new(20.0, 0.0);

/// eframe application hosting the cluster renderer on a pan/zoom canvas.
pub struct AtlasApp {
    renderer: ClusterRenderer,
    store: Rc<RefCell<SelectionStore>>,
    layer: MarkerLayer,
    camera: MapCamera,
    documents: BTreeMap<DocumentId, Document>,
    observation_count: usize,
    located_count: usize,
    visuals_set: bool,
}

impl AtlasApp {
    /// Build the viewer; fails when the map settings are invalid.
    pub fn new(
        settings: MapSettings,
        observations: Vec<Observation>,
        documents: Vec<Document>,
    ) -> Result<Self, SettingsError> {
        let store = Rc::new(RefCell::new(SelectionStore::new(DisplayMode::default())));
        let mut renderer = ClusterRenderer::new(settings, Rc::clone(&store))?;
        let located: Vec<GeoPoint> = observations
            .iter()
            .filter_map(Observation::coordinates)
            .collect();
        let center = mean_point(&located).unwrap_or(FALLBACK_CENTER);
        tracing::info!(
            "Viewer starting with {} observations ({} located), {} documents",
            observations.len(),
            located.len(),
            documents.len()
        );
        let observation_count = observations.len();
        renderer.set_observations(observations);
        Ok(Self {
            renderer,
            store,
            layer: MarkerLayer::default(),
            camera: MapCamera::new(center, INITIAL_ZOOM),
            documents: documents
                .into_iter()
                .map(|document| (document.id, document))
                .collect(),
            observation_count,
            located_count: located.len(),
            visuals_set: false,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_map_canvas(&mut self, ui: &mut egui::Ui) {
        let now = Instant::now();
        let palette = style::palette();
        let available = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(available, egui::Sense::click_and_drag());

        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if response.hovered() && scroll.abs() > 0.0 {
            let anchor = response.hover_pos().unwrap_or(rect.center());
            self.camera.zoom_by(rect, anchor, scroll);
        }
        if response.dragged() {
            self.camera.pan(response.drag_delta());
        }

        self.renderer.sync(self.camera.projection(), &mut self.layer);

        let hovered = self.update_hover(rect, response.hover_pos(), now);
        if response.clicked() {
            self.handle_click(hovered);
        }
        let animating = self.renderer.tick(&mut self.layer, now);

        let painter = ui.painter_at(rect);
        graticule::paint(&painter, &self.camera, rect, &palette);
        self.layer.paint(&painter, &self.camera, rect);

        if let Some(text) = hovered.and_then(|id| self.tooltip_for(id)) {
            response.on_hover_text_at_pointer(text);
        }
        if animating {
            ui.ctx().request_repaint();
        }
    }

    /// Route pointer movement to the renderer and return the marker directly
    /// under the pointer.
    ///
    /// An expanded cluster keeps its hover while the pointer stays inside its
    /// spread footprint, so markers moving out from under a still pointer do not
    /// collapse it again.
    fn update_hover(
        &mut self,
        rect: egui::Rect,
        pointer: Option<egui::Pos2>,
        now: Instant,
    ) -> Option<MarkerId> {
        let hit = self.layer.hit_test(&self.camera, rect, pointer);
        let hovered = hit.or_else(|| self.held_hover(rect, pointer));
        let change = self.layer.set_hovered(hovered);
        if let Some(left) = change.left {
            self.renderer.pointer_left(left, now);
        }
        if let Some(entered) = change.entered {
            self.renderer.pointer_entered(entered, now);
        }
        hit
    }

    fn held_hover(&self, rect: egui::Rect, pointer: Option<egui::Pos2>) -> Option<MarkerId> {
        let pointer = pointer.filter(|pos| rect.contains(*pos))?;
        let current = self.layer.hovered()?;
        let cluster = self.renderer.marker_cluster(current)?;
        if !cluster.motion().is_expanded() {
            return None;
        }
        let definition = cluster.definition();
        let members = cluster
            .markers()
            .iter()
            .zip(&definition.members)
            .flat_map(|(markers, member)| markers.ids().map(move |id| (id, member.spread)));
        self.layer
            .footprint_contains(&self.camera, rect, definition.center, members, pointer)
            .then_some(current)
    }

    fn handle_click(&mut self, hovered: Option<MarkerId>) {
        let selection = hovered
            .and_then(|id| self.renderer.marker_observation(id))
            .map(|(observation, role)| match role {
                MarkerRole::Parasite => Selection::Parasite(observation.parasite_species.clone()),
                MarkerRole::Host => Selection::Host(observation.host_species.clone()),
            })
            .unwrap_or_default();
        self.store.borrow_mut().set_selection(selection);
    }

    fn tooltip_for(&self, id: MarkerId) -> Option<String> {
        let mut text = self.layer.marker(id)?.tooltip.clone();
        if let Some((observation, _)) = self.renderer.marker_observation(id)
            && let Some(document) = self.documents.get(&observation.document_id)
        {
            let reference = document.reference_paper.trim();
            if !reference.is_empty() {
                text.push('\n');
                text.push_str(reference);
            }
        }
        Some(text)
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        egui::TopBottomPanel::top("atlas_top_bar").show(ctx, |ui| {
            self.render_top_bar(ui);
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.render_map_canvas(ui);
            });
    }
}

fn mean_point(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), point| (lat + point.lat, lng + point.lng));
    Some(GeoPoint::new(lat / count, lng / count))
}
