pub(super) const MAX_GRID_PRECISION: u32 = 9;
pub(super) const MAX_RADIAL_JITTER: f64 = 0.9;
pub(super) const MAX_ANGLE_JITTER_RAD: f64 = std::f64::consts::PI;

pub(super) fn default_grid_precision() -> u32 {
    3
}

pub(super) fn default_ring_capacity() -> usize {
    6
}

pub(super) fn default_base_radius_px() -> f64 {
    22.0
}

pub(super) fn default_reference_zoom() -> f64 {
    8.0
}

pub(super) fn default_min_radius_px() -> f64 {
    14.0
}

pub(super) fn default_max_radius_px() -> f64 {
    48.0
}

pub(super) fn default_angle_jitter_rad() -> f64 {
    0.18
}

pub(super) fn default_radial_jitter() -> f64 {
    0.15
}

pub(super) fn default_duration_ms() -> u64 {
    260
}

pub(super) fn default_collapse_delay_ms() -> u64 {
    120
}

pub(super) fn default_host_radius_extra() -> f32 {
    3.0
}

pub(super) fn default_guide_width() -> f32 {
    1.0
}

pub(super) fn default_guide_opacity() -> f32 {
    0.55
}

pub(super) fn default_highlighted_tier() -> super::MarkerTier {
    super::MarkerTier {
        radius: 6.0,
        fill_opacity: 0.9,
        stroke_width: 1.5,
        stroke_opacity: 1.0,
    }
}

pub(super) fn default_dimmed_tier() -> super::MarkerTier {
    super::MarkerTier {
        radius: 4.0,
        fill_opacity: 0.25,
        stroke_width: 0.5,
        stroke_opacity: 0.3,
    }
}
