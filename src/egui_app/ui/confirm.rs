//! Shared confirmation window for destructive actions and model creation.

use eframe::egui::{self, Align2, Color32, Id, Order, RichText};

use crate::egui_app::state::ConfirmPrompt;

use super::chrome::{action_button, destructive_button};
use super::overlay_layers::modal_backdrop;
use super::{EguiApp, style};

const BACKDROP: Color32 = Color32::from_black_alpha(120);

impl EguiApp {
    pub(super) fn render_confirm_prompt(&mut self, ctx: &egui::Context, prompt: &ConfirmPrompt) {
        let palette = style::palette();
        modal_backdrop(ctx, Id::new("confirm_prompt"), BACKDROP);
        let mut accepted = false;
        let mut dismissed = false;
        egui::Window::new(prompt.title())
            .order(Order::Tooltip)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .auto_sized()
            .show(ctx, |ui| {
                ui.set_min_width(280.0);
                ui.set_max_width(360.0);
                ui.label(RichText::new(prompt.message()).color(palette.text_primary));
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    let confirm = if prompt.destructive() {
                        destructive_button(prompt.confirm_label())
                    } else {
                        action_button(prompt.confirm_label())
                    };
                    if ui.add(confirm).clicked() {
                        accepted = true;
                    }
                    if ui.add(action_button("Cancel")).clicked() {
                        dismissed = true;
                    }
                });
            });
        if accepted {
            self.controller.confirm_prompt_accepted();
        } else if dismissed {
            self.controller.dismiss_confirm_prompt();
        }
    }
}
