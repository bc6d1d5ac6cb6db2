//! Records tab: admin-wide prediction management.

use eframe::egui::{self, ComboBox, Key, RichText, TextEdit};

use crate::egui_app::controller::{PAGE_SIZE, total_pages};

use super::chrome::{self, action_button};
use super::history_panel::{PredictionRowAction, prediction_detail_window, prediction_table};
use super::{EguiApp, style};

impl EguiApp {
    pub(super) fn render_records_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Prediction records").color(palette.text_primary));
            if self.controller.ui.records.loading {
                ui.spinner();
            }
        });
        ui.add_space(6.0);

        self.render_records_filters(ui);
        ui.add_space(6.0);

        let records = &self.controller.ui.records;
        if records.loaded_once && records.rows.is_empty() {
            ui.label(RichText::new("No matching records").color(palette.text_muted));
            return;
        }
        let rows = records.rows.clone();
        let page = records.page.max(1);
        let pages = total_pages(records.total, PAGE_SIZE);

        match prediction_table(ui, "records_table", &rows, true) {
            Some(PredictionRowAction::Open(id)) => self.controller.open_record_detail(&id),
            Some(PredictionRowAction::Delete(id)) => self.controller.request_delete_prediction(&id),
            None => {}
        }
        ui.add_space(6.0);
        if let Some(requested) = chrome::pager(ui, page, pages) {
            self.controller.set_records_page(requested);
        }

        if let Some(detail) = self.controller.ui.records.detail.clone()
            && !prediction_detail_window(ctx, "Record detail", &detail)
        {
            self.controller.close_record_detail();
        }
    }

    fn render_records_filters(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let mut submit_search = false;
        let mut model_change: Option<Option<String>> = None;
        let mut result_change: Option<Option<String>> = None;
        ui.horizontal(|ui| {
            let records = &mut self.controller.ui.records;
            let search = ui.add(
                TextEdit::singleline(&mut records.search_input)
                    .hint_text("Search image name...")
                    .desired_width(200.0),
            );
            if search.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                submit_search = true;
            }
            if ui.add(action_button("Search")).clicked() {
                submit_search = true;
            }
            ui.separator();

            let model_label = records.model_filter.as_deref().unwrap_or("All models");
            ComboBox::from_id_salt("records_model_filter")
                .selected_text(model_label)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(records.model_filter.is_none(), "All models")
                        .clicked()
                    {
                        model_change = Some(None);
                    }
                    for model in &records.filter_options.models {
                        let selected = records.model_filter.as_deref() == Some(model.as_str());
                        if ui.selectable_label(selected, model).clicked() {
                            model_change = Some(Some(model.clone()));
                        }
                    }
                });

            let result_label = records.result_filter.as_deref().unwrap_or("All results");
            ComboBox::from_id_salt("records_result_filter")
                .selected_text(result_label)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(records.result_filter.is_none(), "All results")
                        .clicked()
                    {
                        result_change = Some(None);
                    }
                    for result in &records.filter_options.results {
                        let selected = records.result_filter.as_deref() == Some(result.as_str());
                        if ui.selectable_label(selected, result).clicked() {
                            result_change = Some(Some(result.clone()));
                        }
                    }
                });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{} records", records.total)).color(palette.text_muted),
                );
            });
        });
        if submit_search {
            self.controller.submit_records_search();
        }
        if let Some(model) = model_change {
            self.controller.set_records_model_filter(model);
        }
        if let Some(result) = result_change {
            self.controller.set_records_result_filter(result);
        }
    }
}
