use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, saving or validating map settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Grid precision would overflow the scaled cell index.
    #[error("Grid precision {0} exceeds the maximum of 9 decimal digits")]
    GridPrecision(u32),
    /// A ring must hold at least one member.
    #[error("Ring capacity must be at least 1")]
    ZeroRingCapacity,
    /// A radius or zoom constant is zero, negative or not finite.
    #[error("{name} must be a positive finite number (got {value})")]
    NonPositive {
        /// Setting name as it appears in the TOML file.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Minimum ring radius exceeds the maximum.
    #[error("min_radius_px ({min}) is larger than max_radius_px ({max})")]
    RadiusRange {
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
    /// A jitter fraction or angle falls outside its allowed range.
    #[error("{name} must be within [0, {limit}] (got {value})")]
    Jitter {
        /// Setting name as it appears in the TOML file.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Inclusive upper bound.
        limit: f64,
    },
    /// Animation duration or collapse delay of zero.
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    /// An opacity outside `[0, 1]`.
    #[error("{name} must be within [0, 1] (got {value})")]
    Opacity {
        /// Setting name as it appears in the TOML file.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
    /// Failed to resolve the application directory.
    #[error("No usable settings directory: {0}")]
    AppDir(#[from] crate::app_dirs::AppDirError),
    /// Failed to read the settings file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Settings file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to write the settings file.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Settings file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("Invalid settings at {path}: {source}")]
    ParseToml {
        /// Settings file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
    /// Failed to serialize settings to TOML.
    #[error("Failed to serialize settings to TOML at {path}: {source}")]
    SerializeToml {
        /// Settings file path.
        path: PathBuf,
        /// TOML serialization error.
        source: toml::ser::Error,
    },
}
