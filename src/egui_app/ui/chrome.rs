//! Window chrome: top bar with the tab strip, and the footer status bar.

use eframe::egui::{self, Frame, Margin, RichText, StrokeKind};

use crate::egui_app::state::WorkspaceTab;

use super::EguiApp;
use super::style;

pub(super) fn action_button(label: &str) -> egui::Button<'_> {
    egui::Button::new(RichText::new(label).color(style::palette().text_primary))
}

pub(super) fn destructive_button(label: &str) -> egui::Button<'_> {
    egui::Button::new(RichText::new(label).color(style::destructive_text()))
}

/// Prev/next pager for a 1-based paged table. Returns the requested page.
pub(super) fn pager(ui: &mut egui::Ui, page: u32, total_pages: u32) -> Option<u32> {
    let palette = style::palette();
    let mut requested = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(page > 1, action_button("< Prev"))
            .clicked()
        {
            requested = Some(page - 1);
        }
        ui.label(
            RichText::new(format!("Page {page} of {total_pages}")).color(palette.text_muted),
        );
        if ui
            .add_enabled(page < total_pages, action_button("Next >"))
            .clicked()
        {
            requested = Some(page + 1);
        }
    });
    requested
}

impl EguiApp {
    pub(super) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Mammodesk")
                            .color(palette.accent_teal)
                            .strong(),
                    );
                    ui.add_space(12.0);
                    ui.separator();
                    let active = self.controller.ui.active_tab;
                    let mut selected: Option<WorkspaceTab> = None;
                    for tab in self.controller.visible_tabs() {
                        let is_active = tab == active;
                        let label = RichText::new(tab.label()).color(if is_active {
                            palette.accent_ice
                        } else {
                            palette.text_primary
                        });
                        if ui.selectable_label(is_active, label).clicked() && !is_active {
                            selected = Some(tab);
                        }
                    }
                    if let Some(tab) = selected {
                        self.controller.select_tab(tab);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add(action_button("Sign out")).clicked() {
                            self.controller.sign_out();
                        }
                        ui.separator();
                        if let Some(profile) = self.controller.profile() {
                            ui.label(
                                RichText::new(profile.role.label()).color(palette.text_muted),
                            );
                            let display = if profile.name.trim().is_empty() {
                                profile.email.clone()
                            } else {
                                profile.name.clone()
                            };
                            ui.label(RichText::new(display).color(palette.text_primary))
                                .on_hover_text(&profile.email);
                        }
                    });
                });
            });
    }

    pub(super) fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = self.controller.ui.status.clone();
                ui.horizontal(|ui| {
                    ui.add_space(6.0);
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 0.0, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        style::inner_border(),
                        StrokeKind::Inside,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                    ui.separator();
                    let text = ui.label(RichText::new(&status.text).color(palette.text_primary));
                    let log = status.log_text();
                    if !log.is_empty() {
                        text.on_hover_text(log);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(self.controller.base_url()).color(palette.text_muted),
                        );
                    });
                });
            });
    }
}
