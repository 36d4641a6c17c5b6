use parasite_atlas::map::{GeoPoint, MapProjector, PixelPoint};

/// Equirectangular projector: `2^zoom * 100` pixels per degree, y grows southwards.
#[derive(Clone, Copy, Debug)]
pub struct LinearProjector {
    pub zoom: f64,
}

impl LinearProjector {
    pub fn new(zoom: f64) -> Self {
        Self { zoom }
    }

    fn scale(&self) -> f64 {
        2_f64.powf(self.zoom) * 100.0
    }
}

impl MapProjector for LinearProjector {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn project(&self, point: GeoPoint) -> PixelPoint {
        PixelPoint::new(point.lng * self.scale(), -point.lat * self.scale())
    }

    fn unproject(&self, pixel: PixelPoint) -> GeoPoint {
        GeoPoint::new(-pixel.y / self.scale(), pixel.x / self.scale())
    }
}
