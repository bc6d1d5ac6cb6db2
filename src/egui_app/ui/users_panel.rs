//! Users tab: account table with filters and a per-account edit window.

use eframe::egui::{self, Align2, ComboBox, Grid, Key, RichText, ScrollArea, TextEdit};

use crate::egui_app::controller::{PAGE_SIZE, total_pages};
use crate::session::UserRole;

use super::chrome::{self, action_button, destructive_button};
use super::{EguiApp, style};

impl EguiApp {
    pub(super) fn render_users_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Accounts").color(palette.text_primary));
            if self.controller.ui.users.loading {
                ui.spinner();
            }
        });
        ui.add_space(8.0);

        self.render_users_filters(ui);
        ui.add_space(8.0);

        let users = &self.controller.ui.users;
        if users.loaded_once && users.rows.is_empty() {
            ui.label(RichText::new("No matching accounts").color(palette.text_muted));
        } else {
            enum TableAction {
                Edit(String),
                Delete(String),
            }
            let rows = users.rows.clone();
            let mut action = None;
            ScrollArea::vertical().id_salt("users_table").show(ui, |ui| {
                Grid::new("users_grid")
                    .num_columns(8)
                    .striped(true)
                    .min_col_width(70.0)
                    .show(ui, |ui| {
                        for header in
                            ["Name", "Email", "Role", "Provider", "Status", "Confirmed", "Created"]
                        {
                            ui.label(RichText::new(header).color(palette.text_muted));
                        }
                        ui.label("");
                        ui.end_row();
                        for row in &rows {
                            ui.label(RichText::new(&row.name).color(palette.text_primary));
                            ui.label(RichText::new(&row.email).color(palette.text_primary));
                            ui.label(RichText::new(row.role.label()).color(palette.text_primary));
                            ui.label(
                                RichText::new(&row.auth_provider).color(palette.text_muted),
                            );
                            if row.is_revoked {
                                ui.label(RichText::new("Revoked").color(palette.warning));
                            } else {
                                ui.label(RichText::new("Active").color(palette.success));
                            }
                            ui.label(
                                RichText::new(if row.confirmed { "Yes" } else { "No" })
                                    .color(palette.text_muted),
                            );
                            ui.label(RichText::new(&row.created_label).color(palette.text_muted));
                            ui.horizontal(|ui| {
                                if ui.add(action_button("Edit")).clicked() {
                                    action = Some(TableAction::Edit(row.id.clone()));
                                }
                                if ui.add(destructive_button("Delete")).clicked() {
                                    action = Some(TableAction::Delete(row.id.clone()));
                                }
                            });
                            ui.end_row();
                        }
                    });
            });
            ui.add_space(6.0);
            let page = self.controller.ui.users.page.max(1);
            let pages = total_pages(self.controller.ui.users.total, PAGE_SIZE);
            let requested = chrome::pager(ui, page, pages);

            match action {
                Some(TableAction::Edit(id)) => self.controller.open_user_editor(&id),
                Some(TableAction::Delete(id)) => self.controller.request_delete_user(&id),
                None => {}
            }
            if let Some(page) = requested {
                self.controller.set_users_page(page);
            }
        }

        self.render_user_editor(ctx);
    }

    fn render_users_filters(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let mut submit = false;
        let mut role_change: Option<Option<UserRole>> = None;
        let mut provider_change: Option<Option<String>> = None;
        let mut revoked_change: Option<Option<bool>> = None;
        ui.horizontal(|ui| {
            let users = &mut self.controller.ui.users;
            let search = ui.add(
                TextEdit::singleline(&mut users.search_input)
                    .desired_width(200.0)
                    .hint_text("Search name or email..."),
            );
            if search.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                submit = true;
            }
            if ui.add(action_button("Search")).clicked() {
                submit = true;
            }

            let role_label = match users.role_filter {
                Some(role) => role.label(),
                None => "All roles",
            };
            ComboBox::from_id_salt("users_role_filter")
                .selected_text(role_label)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(users.role_filter.is_none(), "All roles").clicked() {
                        role_change = Some(None);
                    }
                    for role in [UserRole::Admin, UserRole::Doctor] {
                        let selected = users.role_filter == Some(role);
                        if ui.selectable_label(selected, role.label()).clicked() {
                            role_change = Some(Some(role));
                        }
                    }
                });

            let provider_label = users.provider_filter.as_deref().unwrap_or("All providers");
            ComboBox::from_id_salt("users_provider_filter")
                .selected_text(provider_label)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(users.provider_filter.is_none(), "All providers")
                        .clicked()
                    {
                        provider_change = Some(None);
                    }
                    for provider in ["local", "google", "facebook"] {
                        let selected = users.provider_filter.as_deref() == Some(provider);
                        if ui.selectable_label(selected, provider).clicked() {
                            provider_change = Some(Some(provider.to_string()));
                        }
                    }
                });

            let revoked_label = match users.revoked_filter {
                None => "All statuses",
                Some(true) => "Revoked",
                Some(false) => "Active",
            };
            ComboBox::from_id_salt("users_revoked_filter")
                .selected_text(revoked_label)
                .show_ui(ui, |ui| {
                    for (value, label) in
                        [(None, "All statuses"), (Some(false), "Active"), (Some(true), "Revoked")]
                    {
                        if ui.selectable_label(users.revoked_filter == value, label).clicked() {
                            revoked_change = Some(value);
                        }
                    }
                });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{} accounts", users.total)).color(palette.text_muted),
                );
            });
        });

        if submit {
            self.controller.submit_users_search();
        }
        if let Some(role) = role_change {
            self.controller.set_users_role_filter(role);
        }
        if let Some(provider) = provider_change {
            self.controller.set_users_provider_filter(provider);
        }
        if let Some(revoked) = revoked_change {
            self.controller.set_users_revoked_filter(revoked);
        }
    }

    fn render_user_editor(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.users.edit.open {
            return;
        }
        let palette = style::palette();
        let mut submit = false;
        let mut close = false;
        egui::Window::new("Edit account")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .auto_sized()
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                let edit = &mut self.controller.ui.users.edit;
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&edit.email).color(palette.text_muted));
                    if edit.loading {
                        ui.spinner();
                    }
                });
                ui.add_space(6.0);
                ui.label(RichText::new("Name").color(palette.text_primary));
                ui.add(TextEdit::singleline(&mut edit.name).desired_width(f32::INFINITY));
                ui.add_space(4.0);
                ui.checkbox(
                    &mut edit.role_admin,
                    RichText::new("Administrator").color(palette.text_primary),
                );
                ui.checkbox(
                    &mut edit.is_revoked,
                    RichText::new("Access revoked").color(palette.text_primary),
                );
                ui.checkbox(
                    &mut edit.confirmed,
                    RichText::new("Email confirmed").color(palette.text_primary),
                );
                if let Some(error) = &edit.last_error {
                    ui.add_space(6.0);
                    ui.label(RichText::new(error).color(style::destructive_text()));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let busy = edit.saving || edit.loading;
                    let label = if edit.saving { "Saving..." } else { "Save" };
                    if ui.add_enabled(!busy, action_button(label)).clicked() {
                        submit = true;
                    }
                    if ui.add_enabled(!edit.saving, action_button("Cancel")).clicked() {
                        close = true;
                    }
                });
            });

        if submit {
            self.controller.submit_user_edit();
        }
        if close {
            self.controller.close_user_editor();
        }
    }
}
