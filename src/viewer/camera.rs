use eframe::egui;

use crate::map::{GeoPoint, MapProjector, PixelPoint, WebMercator};

pub(crate) const MIN_ZOOM: f64 = 1.0;
pub(crate) const MAX_ZOOM: f64 = 18.0;
const ZOOM_SPEED: f64 = 0.004;
/// Projector zoom snaps to this step so smooth scrolling does not rebuild every frame.
const ZOOM_STEP: f64 = 0.25;

/// Pan/zoom state of the map canvas.
///
/// The projector's world pixels are independent of pan; the camera only adds
/// the screen translation that puts `center` in the middle of the canvas.
#[derive(Clone, Debug)]
pub(crate) struct MapCamera {
    projection: WebMercator,
    wheel_zoom: f64,
    center: GeoPoint,
}

impl MapCamera {
    pub(crate) fn new(center: GeoPoint, zoom: f64) -> Self {
        let zoom = snap(zoom.clamp(MIN_ZOOM, MAX_ZOOM));
        Self {
            projection: WebMercator::new(zoom),
            wheel_zoom: zoom,
            center,
        }
    }

    pub(crate) fn projection(&self) -> &WebMercator {
        &self.projection
    }

    pub(crate) fn zoom(&self) -> f64 {
        self.projection.zoom()
    }

    pub(crate) fn center(&self) -> GeoPoint {
        self.center
    }

    pub(crate) fn geo_to_screen(&self, rect: egui::Rect, point: GeoPoint) -> egui::Pos2 {
        let world = self.projection.project(point);
        let origin = self.projection.project(self.center);
        egui::pos2(
            rect.center().x + (world.x - origin.x) as f32,
            rect.center().y + (world.y - origin.y) as f32,
        )
    }

    pub(crate) fn screen_to_geo(&self, rect: egui::Rect, pos: egui::Pos2) -> GeoPoint {
        let origin = self.projection.project(self.center);
        let offset = pos - rect.center();
        self.projection.unproject(PixelPoint::new(
            origin.x + f64::from(offset.x),
            origin.y + f64::from(offset.y),
        ))
    }

    /// Move the map with the pointer by `delta` screen pixels.
    pub(crate) fn pan(&mut self, delta: egui::Vec2) {
        let origin = self.projection.project(self.center);
        self.center = self.projection.unproject(PixelPoint::new(
            origin.x - f64::from(delta.x),
            origin.y - f64::from(delta.y),
        ));
    }

    /// Apply a scroll delta, keeping the geographic point under `anchor` in place.
    ///
    /// Returns whether the projector zoom changed.
    pub(crate) fn zoom_by(&mut self, rect: egui::Rect, anchor: egui::Pos2, scroll: f32) -> bool {
        self.wheel_zoom =
            (self.wheel_zoom + f64::from(scroll) * ZOOM_SPEED).clamp(MIN_ZOOM, MAX_ZOOM);
        let snapped = snap(self.wheel_zoom);
        if snapped == self.projection.zoom() {
            return false;
        }
        let anchor_geo = self.screen_to_geo(rect, anchor);
        self.projection.set_zoom(snapped);
        let anchor_world = self.projection.project(anchor_geo);
        let offset = anchor - rect.center();
        self.center = self.projection.unproject(PixelPoint::new(
            anchor_world.x - f64::from(offset.x),
            anchor_world.y - f64::from(offset.y),
        ));
        true
    }

    /// Geographic bounds of the canvas as `(south_west, north_east)`.
    pub(crate) fn visible_bounds(&self, rect: egui::Rect) -> (GeoPoint, GeoPoint) {
        let north_west = self.screen_to_geo(rect, rect.left_top());
        let south_east = self.screen_to_geo(rect, rect.right_bottom());
        (
            GeoPoint::new(south_east.lat, north_west.lng),
            GeoPoint::new(north_west.lat, south_east.lng),
        )
    }
}

fn snap(zoom: f64) -> f64 {
    (zoom / ZOOM_STEP).round() * ZOOM_STEP
}
