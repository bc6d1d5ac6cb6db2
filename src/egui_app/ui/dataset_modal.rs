//! Dataset export modal: statistics, ratio selection, confirmation gate.

use eframe::egui::{self, Align2, Color32, Id, Order, RichText};

use crate::egui_app::state::DatasetModalPhase;

use super::chrome::action_button;
use super::overlay_layers::modal_backdrop;
use super::ratio_selector::ratio_selector;
use super::{EguiApp, chart, style};

const BACKDROP: Color32 = Color32::from_black_alpha(160);

impl EguiApp {
    pub(super) fn render_dataset_modal(&mut self, ctx: &egui::Context) {
        let phase = self.controller.ui.dataset.phase;
        if phase == DatasetModalPhase::Closed {
            return;
        }
        modal_backdrop(ctx, Id::new("dataset_modal"), BACKDROP);
        match phase {
            DatasetModalPhase::Closed => {}
            DatasetModalPhase::Loading => self.render_dataset_loading(ctx),
            DatasetModalPhase::Ready => self.render_dataset_ready(ctx),
            DatasetModalPhase::Confirming => self.render_dataset_confirming(ctx),
            DatasetModalPhase::Exporting => self.render_dataset_exporting(ctx),
        }
    }

    fn render_dataset_loading(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        let mut close = false;
        dataset_window("Export dataset").show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    RichText::new("Loading dataset statistics...").color(palette.text_muted),
                );
            });
            if let Some(error) = &self.controller.ui.dataset.last_error {
                ui.add_space(6.0);
                ui.label(RichText::new(error).color(style::destructive_text()));
                ui.label(
                    RichText::new("Close and reopen to retry.").color(palette.text_muted),
                );
            }
            ui.add_space(8.0);
            if ui.add(action_button("Close")).clicked() {
                close = true;
            }
        });
        if close {
            self.controller.close_dataset_modal();
        }
    }

    fn render_dataset_ready(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        let distribution = self.controller.ui.dataset.distribution.clone();
        let mut export = false;
        let mut close = false;
        dataset_window("Export dataset").show(ctx, |ui| {
            ui.set_min_width(420.0);
            if let Some(distribution) = &distribution {
                chart::distribution_chart(ui, distribution);
                ui.add_space(10.0);
            }
            ui.label(RichText::new("Train / validation / test split").color(palette.text_primary));
            ratio_selector(ui, &mut self.controller.ui.dataset.ratio);
            ui.add_space(4.0);
            ui.label(
                RichText::new(self.controller.ui.dataset.ratio.summary())
                    .color(palette.text_muted),
            );
            if let Some(error) = &self.controller.ui.dataset.last_error {
                ui.add_space(6.0);
                ui.label(RichText::new(error).color(style::destructive_text()));
            }
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.add(action_button("Export...")).clicked() {
                    export = true;
                }
                if ui.add(action_button("Close")).clicked() {
                    close = true;
                }
            });
        });
        if export {
            self.controller.request_dataset_export();
        }
        if close {
            self.controller.close_dataset_modal();
        }
    }

    fn render_dataset_confirming(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        let ratio = self.controller.ui.dataset.ratio;
        let mut confirm = false;
        let mut cancel = false;
        dataset_window("Confirm export").show(ctx, |ui| {
            ui.set_min_width(280.0);
            ui.label(
                RichText::new("The full dataset will be downloaded as a zip archive split into:")
                    .color(palette.text_primary),
            );
            ui.add_space(6.0);
            for (label, percent) in [
                ("Training", ratio.train_percent()),
                ("Validation", ratio.val_percent()),
                ("Test", ratio.test_percent()),
            ] {
                ui.label(
                    RichText::new(format!("{label}: {percent}%")).color(palette.text_muted),
                );
            }
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.add(action_button("Confirm export")).clicked() {
                    confirm = true;
                }
                if ui.add(action_button("Cancel")).clicked() {
                    cancel = true;
                }
            });
        });
        if confirm {
            self.controller.confirm_dataset_export();
        }
        if cancel {
            self.controller.cancel_dataset_confirmation();
        }
    }

    fn render_dataset_exporting(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        let summary = self.controller.ui.dataset.ratio.summary();
        dataset_window("Export dataset").show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    RichText::new(format!("Exporting dataset ({summary})..."))
                        .color(palette.text_muted),
                );
            });
            ui.add_space(8.0);
            ui.add_enabled(false, action_button("Close"));
        });
    }
}

fn dataset_window(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .order(Order::Tooltip)
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .auto_sized()
}
