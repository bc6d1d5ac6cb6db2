//! History tab: the signed-in doctor's own predictions.

use eframe::egui::{self, Align2, Grid, RichText, ScrollArea};

use crate::egui_app::controller::{PAGE_SIZE, total_pages};
use crate::egui_app::state::PredictionRowView;

use super::chrome::{self, action_button, destructive_button};
use super::{EguiApp, style};

/// Click outcome from a prediction table row.
pub(super) enum PredictionRowAction {
    Open(String),
    Delete(String),
}

/// Shared table for the History and Records tabs.
pub(super) fn prediction_table(
    ui: &mut egui::Ui,
    id_salt: &str,
    rows: &[PredictionRowView],
    allow_delete: bool,
) -> Option<PredictionRowAction> {
    let palette = style::palette();
    let mut action = None;
    ScrollArea::vertical().id_salt(id_salt).show(ui, |ui| {
        Grid::new(format!("{id_salt}_grid"))
            .num_columns(if allow_delete { 6 } else { 5 })
            .striped(true)
            .min_col_width(70.0)
            .show(ui, |ui| {
                for header in ["Image", "Result", "Confidence", "Model", "Date"] {
                    ui.label(RichText::new(header).color(palette.text_muted));
                }
                if allow_delete {
                    ui.label(RichText::new("").color(palette.text_muted));
                }
                ui.end_row();
                for row in rows {
                    if ui
                        .link(RichText::new(&row.image_name).color(palette.accent_ice))
                        .clicked()
                    {
                        action = Some(PredictionRowAction::Open(row.id.clone()));
                    }
                    let result_color = match row.category {
                        Some(category) if category.number() >= 4 => palette.warning,
                        Some(_) => palette.text_primary,
                        None => palette.text_muted,
                    };
                    ui.label(RichText::new(&row.result_label).color(result_color));
                    ui.label(RichText::new(&row.probability_label).color(palette.text_primary));
                    ui.label(RichText::new(&row.model_name).color(palette.text_primary));
                    ui.label(RichText::new(&row.created_label).color(palette.text_muted));
                    if allow_delete && ui.add(destructive_button("Delete")).clicked() {
                        action = Some(PredictionRowAction::Delete(row.id.clone()));
                    }
                    ui.end_row();
                }
            });
    });
    action
}

/// Detail window for one prediction. Returns false once the window should
/// close.
pub(super) fn prediction_detail_window(
    ctx: &egui::Context,
    title: &str,
    row: &PredictionRowView,
) -> bool {
    let palette = style::palette();
    let mut open = true;
    egui::Window::new(title)
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .auto_sized()
        .open(&mut open)
        .show(ctx, |ui| {
            ui.set_min_width(320.0);
            Grid::new("prediction_detail_grid")
                .num_columns(2)
                .show(ui, |ui| {
                    let fields = [
                        ("Image", row.image_name.as_str()),
                        ("Result", row.result_label.as_str()),
                        ("Confidence", row.probability_label.as_str()),
                        ("Model", row.model_name.as_str()),
                        ("Date", row.created_label.as_str()),
                    ];
                    for (name, value) in fields {
                        ui.label(RichText::new(name).color(palette.text_muted));
                        ui.label(RichText::new(value).color(palette.text_primary));
                        ui.end_row();
                    }
                    if let Some(doctor) = &row.doctor_id {
                        ui.label(RichText::new("Doctor").color(palette.text_muted));
                        ui.label(RichText::new(doctor).color(palette.text_primary));
                        ui.end_row();
                    }
                });
            if let Some(category) = row.category {
                ui.add_space(6.0);
                ui.label(RichText::new(category.guidance()).color(palette.text_muted));
            }
            ui.add_space(8.0);
            if !row.image_url.trim().is_empty()
                && ui.add(action_button("Open image in browser")).clicked()
                && let Err(err) = open::that(&row.image_url)
            {
                tracing::warn!("Could not open image url: {err}");
            }
        });
    open
}

impl EguiApp {
    pub(super) fn render_history_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let palette = style::palette();
        let history = &self.controller.ui.history;
        ui.horizontal(|ui| {
            ui.heading(RichText::new("My predictions").color(palette.text_primary));
            if history.loading {
                ui.spinner();
            }
        });
        ui.add_space(6.0);

        if history.loaded_once && history.rows.is_empty() {
            ui.label(RichText::new("No predictions yet").color(palette.text_muted));
            return;
        }

        let rows = history.rows.clone();
        let page = history.page.max(1);
        let pages = total_pages(history.total, PAGE_SIZE);
        if let Some(PredictionRowAction::Open(id)) =
            prediction_table(ui, "history_table", &rows, false)
        {
            self.controller.open_history_detail(&id);
        }
        ui.add_space(6.0);
        if let Some(requested) = chrome::pager(ui, page, pages) {
            self.controller.load_history_page(requested);
        }

        if let Some(detail) = self.controller.ui.history.detail.clone()
            && !prediction_detail_window(ctx, "Prediction detail", &detail)
        {
            self.controller.close_history_detail();
        }
    }
}
