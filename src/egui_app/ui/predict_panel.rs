//! Predict tab: model banner, mammogram upload, classification outcome.

use eframe::egui::{self, ProgressBar, RichText};

use crate::birads::BiRadsCategory;

use super::chrome::action_button;
use super::{EguiApp, style};

impl EguiApp {
    pub(super) fn render_predict_panel(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let busy = self.controller.ui.progress.visible;

        let banner = self.controller.ui.predict.banner.clone();
        style::section_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Serving model").color(palette.text_muted));
                ui.separator();
                if !banner.loaded {
                    ui.label(RichText::new("Loading...").color(palette.text_muted));
                } else {
                    ui.label(
                        RichText::new(format!("{} {}", banner.name, banner.version))
                            .color(palette.text_primary),
                    );
                    ui.separator();
                    if banner.available {
                        ui.label(RichText::new("Ready").color(palette.success));
                    } else {
                        ui.label(RichText::new("Unavailable").color(palette.warning));
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add(action_button("Refresh")).clicked() {
                        self.controller.refresh_model_banner();
                    }
                });
            });
        });
        ui.add_space(8.0);

        style::section_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!busy, action_button("Select mammogram..."))
                    .clicked()
                {
                    self.controller.pick_mammogram();
                }
                match self.controller.ui.predict.selected_image_name() {
                    Some(name) => {
                        ui.label(RichText::new(name).color(palette.text_primary));
                    }
                    None => {
                        ui.label(
                            RichText::new("No image selected (.jpg, .jpeg, .png)")
                                .color(palette.text_muted),
                        );
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let can_run = !busy
                        && self.controller.ui.predict.selected_image.is_some()
                        && self.controller.ui.predict.banner.available;
                    if ui.add_enabled(can_run, action_button("Classify")).clicked() {
                        self.controller.submit_predict();
                    }
                });
            });
            if let Some(error) = &self.controller.ui.predict.last_error {
                ui.add_space(4.0);
                ui.label(RichText::new(error).color(style::destructive_text()));
            }
        });
        ui.add_space(8.0);

        if let Some(outcome) = self.controller.ui.predict.outcome.clone() {
            style::section_frame().show(ui, |ui| {
                ui.heading(
                    RichText::new(outcome.category.label()).color(palette.accent_teal),
                );
                ui.label(
                    RichText::new(outcome.category.assessment()).color(palette.text_primary),
                );
                ui.label(RichText::new(outcome.category.guidance()).color(palette.text_muted));
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!(
                        "Confidence: {:.1}%",
                        outcome.confidence * 100.0
                    ))
                    .color(palette.text_primary),
                );
                ui.add_space(8.0);
                for (index, probability) in outcome
                    .probabilities
                    .iter()
                    .take(BiRadsCategory::ALL.len())
                    .enumerate()
                {
                    let Some(category) = BiRadsCategory::from_index(index) else {
                        break;
                    };
                    let highlight = category == outcome.category;
                    ui.horizontal(|ui| {
                        let label = RichText::new(category.label()).color(if highlight {
                            palette.accent_teal
                        } else {
                            palette.text_muted
                        });
                        ui.add_sized(egui::vec2(90.0, 16.0), egui::Label::new(label));
                        ui.add(
                            ProgressBar::new(*probability as f32)
                                .desired_width(260.0)
                                .fill(style::chart_bar_color(highlight))
                                .text(format!("{:.1}%", probability * 100.0)),
                        );
                    });
                }
            });
        }
    }
}
