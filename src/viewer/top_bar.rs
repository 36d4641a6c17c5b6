use eframe::egui::{self, RichText};

use super::AtlasApp;
use super::style;
use crate::map::{DisplayMode, Selection};

impl AtlasApp {
    pub(super) fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.label(RichText::new("Parasite Atlas").strong());
            ui.separator();

            let mut mode = self.store.borrow().display_mode();
            ui.selectable_value(&mut mode, DisplayMode::Parasite, "Parasites");
            ui.selectable_value(&mut mode, DisplayMode::Host, "Hosts");
            ui.selectable_value(&mut mode, DisplayMode::Both, "Both");
            self.store.borrow_mut().set_display_mode(mode);
            ui.separator();

            if !self.documents.is_empty() {
                self.render_paper_picker(ui);
                ui.separator();
            }

            let selection = self.store.borrow().selection().clone();
            ui.label(RichText::new(self.selection_label(&selection)).color(palette.accent));
            if ui
                .add_enabled(selection.is_active(), egui::Button::new("Clear"))
                .clicked()
            {
                self.store.borrow_mut().clear_selection();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!(
                        "{} observations, {} on map, zoom {:.2}",
                        self.observation_count,
                        self.located_count,
                        self.camera.zoom()
                    ))
                    .color(palette.text_muted),
                );
            });
        });
    }

    fn render_paper_picker(&mut self, ui: &mut egui::Ui) {
        let current = match self.store.borrow().selection() {
            Selection::Document(id) => Some(*id),
            _ => None,
        };
        let selected_text = current
            .and_then(|id| self.documents.get(&id))
            .map(|document| document.source_file.clone())
            .unwrap_or_else(|| "Paper…".to_string());
        let mut picked = None;
        egui::ComboBox::from_id_salt("atlas_paper_picker")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for (id, document) in &self.documents {
                    let label = if document.reference_paper.trim().is_empty() {
                        document.source_file.clone()
                    } else {
                        format!("{} ({})", document.reference_paper, document.source_file)
                    };
                    if ui.selectable_label(current == Some(*id), label).clicked() {
                        picked = Some(*id);
                    }
                }
            });
        if let Some(id) = picked {
            self.store
                .borrow_mut()
                .set_selection(Selection::Document(id));
        }
    }

    fn selection_label(&self, selection: &Selection) -> String {
        match selection {
            Selection::Document(id) => match self.documents.get(id) {
                Some(document) if !document.reference_paper.trim().is_empty() => {
                    format!("Paper: {}", document.reference_paper.trim())
                }
                _ => selection.label(),
            },
            _ => selection.label(),
        }
    }
}
