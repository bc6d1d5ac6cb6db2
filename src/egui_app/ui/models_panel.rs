//! Models & Stats tab: dashboard cards, registry table, registration form.

use eframe::egui::{self, Align2, Grid, RichText, ScrollArea, TextEdit};

use crate::egui_app::controller::{PAGE_SIZE, page_bounds, total_pages};

use super::chart;
use super::chrome::{self, action_button, destructive_button};
use super::{EguiApp, style};

impl EguiApp {
    pub(super) fn render_models_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Models & statistics").color(palette.text_primary));
            if self.controller.ui.models.loading || self.controller.ui.stats.loading {
                ui.spinner();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(action_button("Export dataset...")).clicked() {
                    self.controller.open_dataset_modal();
                }
                if ui.add(action_button("Register model...")).clicked() {
                    self.controller.open_model_create_form();
                }
                if ui.add(action_button("Refresh")).clicked() {
                    self.controller.refresh_models();
                    self.controller.refresh_dashboard_stats();
                }
            });
        });
        ui.add_space(8.0);

        self.render_stat_cards(ui);
        ui.add_space(8.0);

        if let Some(distribution) = self.controller.ui.stats.distribution.clone() {
            style::section_frame().show(ui, |ui| {
                ui.label(RichText::new("Dataset class distribution").color(palette.text_muted));
                ui.add_space(6.0);
                chart::distribution_chart(ui, &distribution);
            });
            ui.add_space(8.0);
        }

        self.render_model_table(ui);
        self.render_model_form(ctx);
    }

    fn render_stat_cards(&mut self, ui: &mut egui::Ui) {
        let stats = self.controller.ui.stats.clone();
        ui.horizontal(|ui| {
            stat_card(ui, "Total predictions", &stats.total_predictions.to_string(), None);
            let delta = stats.today_delta();
            let delta_label = if delta >= 0 {
                format!("+{delta} vs yesterday")
            } else {
                format!("{delta} vs yesterday")
            };
            stat_card(ui, "Today", &stats.today.to_string(), Some(&delta_label));
            stat_card(
                ui,
                "Average confidence",
                &format!("{:.1}%", stats.average_confidence),
                None,
            );
            let banner = &self.controller.ui.predict.banner;
            let serving = if banner.loaded {
                format!("{} {}", banner.name, banner.version)
            } else {
                "Loading...".to_string()
            };
            stat_card(ui, "Serving model", &serving, None);
        });
    }

    fn render_model_table(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let models = &self.controller.ui.models;
        if models.loaded_once && models.rows.is_empty() {
            ui.label(RichText::new("No models registered").color(palette.text_muted));
            return;
        }
        let page = models.page.max(1);
        let pages = total_pages(models.rows.len() as u64, PAGE_SIZE);
        let bounds = page_bounds(models.rows.len(), page, PAGE_SIZE);
        let rows: Vec<_> = models.rows[bounds].to_vec();

        enum TableAction {
            Edit(String),
            Activate(String),
            Delete(String),
        }
        let mut action = None;
        ScrollArea::vertical().id_salt("models_table").show(ui, |ui| {
            Grid::new("models_grid")
                .num_columns(7)
                .striped(true)
                .min_col_width(70.0)
                .show(ui, |ui| {
                    for header in ["Name", "Version", "Accuracy", "Artifact", "Registered", "Status"]
                    {
                        ui.label(RichText::new(header).color(palette.text_muted));
                    }
                    ui.label("");
                    ui.end_row();
                    for row in &rows {
                        ui.label(RichText::new(&row.name).color(palette.text_primary));
                        ui.label(RichText::new(&row.version).color(palette.text_primary));
                        ui.label(RichText::new(&row.accuracy_label).color(palette.text_primary));
                        ui.label(RichText::new(&row.artifact_name).color(palette.text_muted));
                        ui.label(RichText::new(&row.created_label).color(palette.text_muted));
                        if row.is_active {
                            ui.label(RichText::new("Active").color(palette.success));
                        } else {
                            ui.label(RichText::new("Inactive").color(palette.text_muted));
                        }
                        ui.horizontal(|ui| {
                            if ui.add(action_button("Edit")).clicked() {
                                action = Some(TableAction::Edit(row.id.clone()));
                            }
                            if !row.is_active {
                                if ui.add(action_button("Activate")).clicked() {
                                    action = Some(TableAction::Activate(row.id.clone()));
                                }
                                if ui.add(destructive_button("Delete")).clicked() {
                                    action = Some(TableAction::Delete(row.id.clone()));
                                }
                            }
                        });
                        ui.end_row();
                    }
                });
        });
        ui.add_space(6.0);
        let requested = chrome::pager(ui, page, pages);

        match action {
            Some(TableAction::Edit(id)) => self.controller.open_model_edit_form(&id),
            Some(TableAction::Activate(id)) => self.controller.request_activate_model(&id),
            Some(TableAction::Delete(id)) => self.controller.request_delete_model(&id),
            None => {}
        }
        if let Some(page) = requested {
            self.controller.set_models_page(page);
        }
    }

    fn render_model_form(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.models.form.open {
            return;
        }
        let palette = style::palette();
        let editing = self.controller.ui.models.form.is_editing();
        let title = if editing { "Edit model" } else { "Register model" };

        let mut submit = false;
        let mut close = false;
        let mut pick_artifact = false;
        let mut pick_labels = false;
        let mut clear_labels = false;
        egui::Window::new(title)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .auto_sized()
            .show(ctx, |ui| {
                ui.set_min_width(360.0);
                let form = &mut self.controller.ui.models.form;
                ui.label(RichText::new("Name").color(palette.text_primary));
                let name = ui.add(
                    TextEdit::singleline(&mut form.name).desired_width(f32::INFINITY),
                );
                if form.focus_name_requested {
                    name.request_focus();
                    form.focus_name_requested = false;
                }
                ui.add_space(4.0);
                ui.label(RichText::new("Version").color(palette.text_primary));
                ui.add(TextEdit::singleline(&mut form.version).desired_width(f32::INFINITY));
                ui.add_space(4.0);
                ui.label(RichText::new("Accuracy % (optional)").color(palette.text_primary));
                ui.add(
                    TextEdit::singleline(&mut form.accuracy_input).desired_width(f32::INFINITY),
                );
                if !editing {
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.add(action_button("Artifact (.pt)...")).clicked() {
                            pick_artifact = true;
                        }
                        let label = form
                            .artifact
                            .as_ref()
                            .and_then(|path| path.file_name())
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_else(|| "none selected".to_string());
                        ui.label(RichText::new(label).color(palette.text_muted));
                    });
                    ui.horizontal(|ui| {
                        if ui.add(action_button("Labels (.txt)...")).clicked() {
                            pick_labels = true;
                        }
                        match form
                            .labels
                            .as_ref()
                            .and_then(|path| path.file_name())
                            .map(|name| name.to_string_lossy().into_owned())
                        {
                            Some(label) => {
                                ui.label(RichText::new(label).color(palette.text_muted));
                                if ui.add(action_button("Clear")).clicked() {
                                    clear_labels = true;
                                }
                            }
                            None => {
                                ui.label(RichText::new("optional").color(palette.text_muted));
                            }
                        }
                    });
                    ui.add_space(4.0);
                    ui.checkbox(
                        &mut form.activate_immediately,
                        RichText::new("Activate immediately").color(palette.text_primary),
                    );
                }
                if let Some(error) = &form.last_error {
                    ui.add_space(6.0);
                    ui.label(RichText::new(error).color(style::destructive_text()));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let saving = form.saving;
                    let save_label = if saving {
                        "Saving..."
                    } else if editing {
                        "Save"
                    } else {
                        "Register..."
                    };
                    if ui.add_enabled(!saving, action_button(save_label)).clicked() {
                        submit = true;
                    }
                    if ui.add_enabled(!saving, action_button("Cancel")).clicked() {
                        close = true;
                    }
                });
            });

        if pick_artifact {
            self.controller.pick_model_artifact();
        }
        if pick_labels {
            self.controller.pick_model_labels();
        }
        if clear_labels {
            self.controller.clear_model_labels();
        }
        if submit {
            self.controller.submit_model_form();
        }
        if close {
            self.controller.close_model_form();
        }
    }
}

fn stat_card(ui: &mut egui::Ui, title: &str, value: &str, caption: Option<&str>) {
    let palette = style::palette();
    style::section_frame().show(ui, |ui| {
        ui.set_min_width(150.0);
        ui.vertical(|ui| {
            ui.label(RichText::new(title).color(palette.text_muted));
            ui.heading(RichText::new(value).color(palette.text_primary));
            if let Some(caption) = caption {
                ui.label(RichText::new(caption).color(palette.text_muted));
            }
        });
    });
}
