//! Entry point for the parasite atlas viewer.
//!
//! Usage: `parasite_atlas [findings.jsonl] [documents.jsonl]`
use std::path::PathBuf;

use eframe::egui;
use parasite_atlas::logging;
use parasite_atlas::observations::{self, Document, Observation};
use parasite_atlas::settings;
use parasite_atlas::viewer::{AtlasApp, MIN_VIEWPORT_SIZE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let inputs = InputPaths::from_args(std::env::args_os().skip(1).map(PathBuf::from));
    let map_settings = settings::load_or_default().unwrap_or_else(|err| {
        tracing::warn!("Using default map settings: {err}");
        settings::MapSettings::default()
    });
    let (observations, documents) = inputs.load();

    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size([1280.0, 800.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Parasite Atlas",
        native_options,
        Box::new(
            move |_cc| match AtlasApp::new(map_settings, observations, documents) {
                Ok(app) => Ok(Box::new(app)),
                Err(err) => Ok(Box::new(LaunchError {
                    message: err.to_string(),
                })),
            },
        ),
    )?;
    Ok(())
}

/// Positional command line inputs.
#[derive(Debug, Default, PartialEq)]
struct InputPaths {
    findings: Option<PathBuf>,
    documents: Option<PathBuf>,
}

impl InputPaths {
    fn from_args(mut args: impl Iterator<Item = PathBuf>) -> Self {
        Self {
            findings: args.next(),
            documents: args.next(),
        }
    }

    /// Load both files; a file that cannot be read is logged and treated as empty.
    fn load(&self) -> (Vec<Observation>, Vec<Document>) {
        let observations = match &self.findings {
            Some(path) => observations::load_jsonl(path).unwrap_or_else(|err| {
                tracing::error!("{err}");
                Vec::new()
            }),
            None => {
                tracing::warn!("No findings file given; the map starts empty");
                Vec::new()
            }
        };
        let documents = match &self.documents {
            Some(path) => observations::load_documents_jsonl(path).unwrap_or_else(|err| {
                tracing::error!("{err}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        (observations, documents)
    }
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start the map");
                ui.label(&self.message);
            });
        });
    }
}
