use super::geo::{GeoPoint, MapProjector, PixelPoint};
use std::f64::consts::PI;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;
/// Edge length of one tile in pixels at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Spherical Web Mercator projection at a fractional zoom level.
///
/// World pixels run from `(0, 0)` at the north-west corner to
/// `TILE_SIZE * 2^zoom` at the south-east corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WebMercator {
    zoom: f64,
}

impl WebMercator {
    pub fn new(zoom: f64) -> Self {
        Self { zoom }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// World size in pixels at the current zoom.
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2_f64.powf(self.zoom)
    }
}

impl MapProjector for WebMercator {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn project(&self, point: GeoPoint) -> PixelPoint {
        let size = self.world_size();
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (point.lng + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        PixelPoint::new(x, y)
    }

    fn unproject(&self, pixel: PixelPoint) -> GeoPoint {
        let size = self.world_size();
        let lng = pixel.x / size * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pixel.y / size);
        let lat = n.sinh().atan().to_degrees();
        GeoPoint::new(lat, lng)
    }
}
