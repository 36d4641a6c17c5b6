use eframe::egui;

use super::camera::MapCamera;
use super::style::Palette;
use crate::map::GeoPoint;
use crate::map::projection::MAX_LATITUDE;

/// Cap on lines per axis so extreme zoom-outs stay cheap.
const MAX_LINES: usize = 120;

/// Degrees between graticule lines at `zoom`.
pub(crate) fn spacing_for_zoom(zoom: f64) -> f64 {
    match zoom {
        z if z < 3.0 => 30.0,
        z if z < 5.0 => 10.0,
        z if z < 7.0 => 5.0,
        z if z < 9.0 => 1.0,
        z if z < 12.0 => 0.25,
        _ => 0.05,
    }
}

/// Multiples of `step` covering `[min, max]`.
pub(crate) fn line_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last)
        .take(MAX_LINES)
        .map(|index| index as f64 * step)
        .collect()
}

pub(crate) fn paint(
    painter: &egui::Painter,
    camera: &MapCamera,
    rect: egui::Rect,
    palette: &Palette,
) {
    painter.rect_filled(rect, 0.0, palette.sea);
    let step = spacing_for_zoom(camera.zoom());
    let (south_west, north_east) = camera.visible_bounds(rect);
    let major = step * 5.0;
    let stroke_for = |value: f64| {
        let on_major = (value / major).round() * major;
        if (value - on_major).abs() < step * 1e-6 {
            egui::Stroke::new(1.0, palette.graticule_major)
        } else {
            egui::Stroke::new(1.0, palette.graticule_minor)
        }
    };
    let south = south_west.lat.max(-MAX_LATITUDE);
    let north = north_east.lat.min(MAX_LATITUDE);
    for lat in line_values(south, north, step) {
        let y = camera.geo_to_screen(rect, GeoPoint::new(lat, south_west.lng)).y;
        painter.hline(rect.x_range(), y, stroke_for(lat));
    }
    let west = south_west.lng.max(-180.0);
    let east = north_east.lng.min(180.0);
    for lng in line_values(west, east, step) {
        let x = camera.geo_to_screen(rect, GeoPoint::new(south_west.lat, lng)).x;
        painter.vline(x, rect.y_range(), stroke_for(lng));
    }
}
