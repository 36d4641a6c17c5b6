/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation between two positions; `t` is not clamped.
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

/// Position in the projector's world-pixel space (independent of pan).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, offset: PixelOffset) -> PixelPoint {
        PixelPoint {
            x: self.x + offset.dx,
            y: self.y + offset.dy,
        }
    }
}

/// Pixel displacement of a spread member from its cluster centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelOffset {
    pub dx: f64,
    pub dy: f64,
}

impl PixelOffset {
    pub const ZERO: PixelOffset = PixelOffset { dx: 0.0, dy: 0.0 };

    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self {
            dx: radius * angle.cos(),
            dy: radius * angle.sin(),
        }
    }

    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Pixel/geo conversion and zoom level exposed by the map widget.
///
/// The clustering engine only reads from the projector; panning must not
/// change the world-pixel coordinates it returns.
pub trait MapProjector {
    fn zoom(&self) -> f64;
    fn project(&self, point: GeoPoint) -> PixelPoint;
    fn unproject(&self, pixel: PixelPoint) -> GeoPoint;
}

impl<P: MapProjector + ?Sized> MapProjector for &P {
    fn zoom(&self) -> f64 {
        (**self).zoom()
    }

    fn project(&self, point: GeoPoint) -> PixelPoint {
        (**self).project(point)
    }

    fn unproject(&self, pixel: PixelPoint) -> GeoPoint {
        (**self).unproject(pixel)
    }
}
