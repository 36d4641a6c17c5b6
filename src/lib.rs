//! Marker clustering and spiderfy engine for parasite observation maps.
/// Application directory resolution.
pub mod app_dirs;
/// Species color hashing.
pub mod colors;
/// Tracing setup and log file rotation.
pub mod logging;
/// Clustering, spread layout, animation and marker orchestration.
pub mod map;
/// Observation and document records plus the JSONL loader.
pub mod observations;
/// TOML-backed map settings.
pub mod settings;
/// eframe desktop viewer.
pub mod viewer;
