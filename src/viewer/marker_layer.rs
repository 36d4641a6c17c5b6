use std::collections::BTreeMap;

use eframe::egui;

use super::camera::MapCamera;
use crate::map::{GeoPoint, GuideId, GuideStyle, MarkerId, MarkerSpec, MarkerSurface};

/// Extra pointer tolerance around a marker's radius.
const HIT_SLOP: f32 = 2.0;

#[derive(Clone, Copy, Debug)]
struct Guide {
    from: GeoPoint,
    to: GeoPoint,
    style: GuideStyle,
}

/// Pointer transition between two frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct HoverChange {
    pub left: Option<MarkerId>,
    pub entered: Option<MarkerId>,
}

/// Retained marker and guide-line scene painted onto the map canvas.
///
/// Markers draw in creation order, so later markers sit on top and win hit tests.
#[derive(Debug, Default)]
pub(crate) struct MarkerLayer {
    next_id: u64,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    guides: BTreeMap<GuideId, Guide>,
    hovered: Option<MarkerId>,
}

impl MarkerLayer {
    pub(crate) fn marker(&self, id: MarkerId) -> Option<&MarkerSpec> {
        self.markers.get(&id)
    }

    #[cfg(test)]
    pub(crate) fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[cfg(test)]
    pub(crate) fn guide_count(&self) -> usize {
        self.guides.len()
    }

    pub(crate) fn hovered(&self) -> Option<MarkerId> {
        self.hovered
    }

    /// Topmost marker under the pointer.
    pub(crate) fn hit_test(
        &self,
        camera: &MapCamera,
        rect: egui::Rect,
        pointer: Option<egui::Pos2>,
    ) -> Option<MarkerId> {
        let pointer = pointer.filter(|pos| rect.contains(*pos))?;
        self.markers
            .iter()
            .rev()
            .find(|(_, spec)| {
                let pos = camera.geo_to_screen(rect, spec.position);
                let reach = spec.style.radius + HIT_SLOP;
                pos.distance_sq(pointer) <= reach * reach
            })
            .map(|(id, _)| *id)
    }

    /// Whether `pointer` lies inside the circle around `center` that holds every
    /// listed marker at its given position, hit reach included.
    pub(crate) fn footprint_contains(
        &self,
        camera: &MapCamera,
        rect: egui::Rect,
        center: GeoPoint,
        members: impl IntoIterator<Item = (MarkerId, GeoPoint)>,
        pointer: egui::Pos2,
    ) -> bool {
        let origin = camera.geo_to_screen(rect, center);
        let reach = members
            .into_iter()
            .filter_map(|(id, position)| {
                let spec = self.markers.get(&id)?;
                let distance = origin.distance(camera.geo_to_screen(rect, position));
                Some(distance + spec.style.radius + HIT_SLOP)
            })
            .fold(0.0_f32, f32::max);
        origin.distance(pointer) <= reach
    }

    /// Record the marker now under the pointer and report what was left and entered.
    pub(crate) fn set_hovered(&mut self, hovered: Option<MarkerId>) -> HoverChange {
        if hovered == self.hovered {
            return HoverChange::default();
        }
        let change = HoverChange {
            left: self.hovered,
            entered: hovered,
        };
        self.hovered = hovered;
        change
    }

    pub(crate) fn paint(&self, painter: &egui::Painter, camera: &MapCamera, rect: egui::Rect) {
        for guide in self.guides.values() {
            let from = camera.geo_to_screen(rect, guide.from);
            let to = camera.geo_to_screen(rect, guide.to);
            painter.line_segment([from, to], guide.style.stroke);
        }
        for spec in self.markers.values() {
            let pos = camera.geo_to_screen(rect, spec.position);
            if !rect.expand(spec.style.radius).contains(pos) {
                continue;
            }
            painter.circle(pos, spec.style.radius, spec.style.fill, spec.style.stroke);
        }
    }
}

impl MarkerSurface for MarkerLayer {
    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        self.markers.insert(id, spec);
        id
    }

    fn move_marker(&mut self, id: MarkerId, position: GeoPoint) {
        if let Some(spec) = self.markers.get_mut(&id) {
            spec.position = position;
        }
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }

    fn add_guide(&mut self, from: GeoPoint, to: GeoPoint, style: GuideStyle) -> GuideId {
        self.next_id += 1;
        let id = GuideId(self.next_id);
        self.guides.insert(id, Guide { from, to, style });
        id
    }

    fn remove_guide(&mut self, id: GuideId) {
        self.guides.remove(&id);
    }
}
