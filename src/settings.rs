//! Tunable constants for clustering, spread layout, animation and marker styling.
//!
//! Settings are read from `map.toml` inside the app directory. Every field has a
//! default, so a missing file or a partial table is fine. Values that would make
//! the layout degenerate (zero ring capacity, inverted radius range, zero
//! durations) are rejected by [`MapSettings::validate`] before any engine is built.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::app_dirs;

mod defaults;
mod errors;

use defaults::*;
pub use errors::SettingsError;

/// Default filename for persisted map settings.
pub const SETTINGS_FILE_NAME: &str = "map.toml";

/// All map engine settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub spread: SpreadSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
    #[serde(default)]
    pub markers: MarkerSettings,
}

/// Coordinate-grid bucketing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Decimal digits kept when rounding coordinates to a grid cell.
    #[serde(default = "default_grid_precision")]
    pub precision: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            precision: default_grid_precision(),
        }
    }
}

/// Ring geometry and jitter for spread clusters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpreadSettings {
    /// Members per concentric ring.
    #[serde(default = "default_ring_capacity")]
    pub ring_capacity: usize,
    /// Innermost ring radius at `reference_zoom`, before clamping.
    #[serde(default = "default_base_radius_px")]
    pub base_radius_px: f64,
    #[serde(default = "default_reference_zoom")]
    pub reference_zoom: f64,
    #[serde(default = "default_min_radius_px")]
    pub min_radius_px: f64,
    #[serde(default = "default_max_radius_px")]
    pub max_radius_px: f64,
    /// Maximum absolute per-member angular jitter in radians.
    #[serde(default = "default_angle_jitter_rad")]
    pub angle_jitter_rad: f64,
    /// Maximum per-member radius perturbation as a fraction of the ring radius.
    #[serde(default = "default_radial_jitter")]
    pub radial_jitter: f64,
}

impl Default for SpreadSettings {
    fn default() -> Self {
        Self {
            ring_capacity: default_ring_capacity(),
            base_radius_px: default_base_radius_px(),
            reference_zoom: default_reference_zoom(),
            min_radius_px: default_min_radius_px(),
            max_radius_px: default_max_radius_px(),
            angle_jitter_rad: default_angle_jitter_rad(),
            radial_jitter: default_radial_jitter(),
        }
    }
}

/// Expand/collapse timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Delay between pointer leave and the collapse it schedules.
    #[serde(default = "default_collapse_delay_ms")]
    pub collapse_delay_ms: u64,
}

impl AnimationSettings {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn collapse_delay(&self) -> Duration {
        Duration::from_millis(self.collapse_delay_ms)
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            collapse_delay_ms: default_collapse_delay_ms(),
        }
    }
}

/// Visual parameters for one highlight tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerTier {
    pub radius: f32,
    pub fill_opacity: f32,
    pub stroke_width: f32,
    pub stroke_opacity: f32,
}

/// Marker and guide-line styling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerSettings {
    /// Host markers sit underneath parasite markers and are drawn this much larger.
    #[serde(default = "default_host_radius_extra")]
    pub host_radius_extra: f32,
    #[serde(default = "default_guide_width")]
    pub guide_width: f32,
    #[serde(default = "default_guide_opacity")]
    pub guide_opacity: f32,
    #[serde(default = "default_highlighted_tier")]
    pub highlighted: MarkerTier,
    #[serde(default = "default_dimmed_tier")]
    pub dimmed: MarkerTier,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            host_radius_extra: default_host_radius_extra(),
            guide_width: default_guide_width(),
            guide_opacity: default_guide_opacity(),
            highlighted: default_highlighted_tier(),
            dimmed: default_dimmed_tier(),
        }
    }
}

impl MapSettings {
    /// Check every section; the first problem found is returned.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.grid.validate()?;
        self.spread.validate()?;
        self.animation.validate()?;
        self.markers.validate()
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.precision > MAX_GRID_PRECISION {
            return Err(SettingsError::GridPrecision(self.precision));
        }
        Ok(())
    }
}

impl SpreadSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.ring_capacity == 0 {
            return Err(SettingsError::ZeroRingCapacity);
        }
        positive("base_radius_px", self.base_radius_px)?;
        positive("reference_zoom", self.reference_zoom)?;
        positive("min_radius_px", self.min_radius_px)?;
        positive("max_radius_px", self.max_radius_px)?;
        if self.min_radius_px > self.max_radius_px {
            return Err(SettingsError::RadiusRange {
                min: self.min_radius_px,
                max: self.max_radius_px,
            });
        }
        within("angle_jitter_rad", self.angle_jitter_rad, MAX_ANGLE_JITTER_RAD)?;
        within("radial_jitter", self.radial_jitter, MAX_RADIAL_JITTER)
    }
}

impl AnimationSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.duration_ms == 0 {
            return Err(SettingsError::ZeroDuration("duration_ms"));
        }
        if self.collapse_delay_ms == 0 {
            return Err(SettingsError::ZeroDuration("collapse_delay_ms"));
        }
        Ok(())
    }
}

impl MarkerSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("highlighted.fill_opacity", self.highlighted.fill_opacity),
            ("highlighted.stroke_opacity", self.highlighted.stroke_opacity),
            ("dimmed.fill_opacity", self.dimmed.fill_opacity),
            ("dimmed.stroke_opacity", self.dimmed.stroke_opacity),
            ("guide_opacity", self.guide_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Opacity { name, value });
            }
        }
        positive("highlighted.radius", f64::from(self.highlighted.radius))?;
        positive("dimmed.radius", f64::from(self.dimmed.radius))
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NonPositive { name, value })
    }
}

fn within(name: &'static str, value: f64, limit: f64) -> Result<(), SettingsError> {
    if value.is_finite() && (0.0..=limit).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::Jitter { name, value, limit })
    }
}

/// Resolve the settings file path inside the app directory.
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    Ok(app_dirs::app_root_dir()?.join(SETTINGS_FILE_NAME))
}

/// Load settings from the app directory, falling back to defaults when the file is absent.
pub fn load_or_default() -> Result<MapSettings, SettingsError> {
    load_from(&settings_path()?)
}

/// Load and validate settings from a specific path.
pub fn load_from(path: &Path) -> Result<MapSettings, SettingsError> {
    if !path.exists() {
        tracing::debug!("No settings at {}; using defaults", path.display());
        return Ok(MapSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: MapSettings =
        toml::from_str(&text).map_err(|source| SettingsError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
    settings.validate()?;
    tracing::info!("Loaded map settings from {}", path.display());
    Ok(settings)
}

/// Write settings as pretty TOML, creating parent directories as needed.
pub fn save_to_path(settings: &MapSettings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| SettingsError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}
