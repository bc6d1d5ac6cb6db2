//! Sign-in window shown while no session is active.

use eframe::egui::{self, Align2, Key, RichText, TextEdit};

use super::EguiApp;
use super::style;

impl EguiApp {
    pub(super) fn render_login(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::CentralPanel::default().show(ctx, |_ui| {});

        let mut submit = false;
        egui::Window::new("Sign in to Mammodesk")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .auto_sized()
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                let login = &mut self.controller.ui.login;
                ui.label(RichText::new("Email").color(palette.text_primary));
                let email = ui.add(
                    TextEdit::singleline(&mut login.email)
                        .hint_text("doctor@clinic.example")
                        .desired_width(f32::INFINITY),
                );
                if login.focus_email_requested {
                    email.request_focus();
                    login.focus_email_requested = false;
                }
                ui.add_space(6.0);
                ui.label(RichText::new("Password").color(palette.text_primary));
                let password = ui.add(
                    TextEdit::singleline(&mut login.password)
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(8.0);
                if let Some(error) = &login.last_error {
                    ui.label(RichText::new(error).color(style::destructive_text()));
                    ui.add_space(6.0);
                }
                let enter_submits = (email.lost_focus() || password.lost_focus())
                    && ui.input(|i| i.key_pressed(Key::Enter));
                let can_submit = login.can_submit();
                let button_label = if login.signing_in {
                    "Signing in..."
                } else {
                    "Sign in"
                };
                let clicked = ui
                    .add_enabled(can_submit, egui::Button::new(button_label))
                    .clicked();
                if can_submit && (clicked || enter_submits) {
                    submit = true;
                }
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Backend: {}", self.controller.base_url()))
                        .color(palette.text_muted),
                );
            });
        if submit {
            self.controller.submit_login();
        }
    }
}
