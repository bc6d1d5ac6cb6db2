//! egui renderer for the Mammodesk workspace.

mod chart;
mod chrome;
mod confirm;
mod dataset_modal;
mod history_panel;
mod login;
mod models_panel;
mod overlay_layers;
mod predict_panel;
mod progress_overlay;
mod ratio_selector;
mod records_panel;
pub mod style;
mod users_panel;

use eframe::egui::{self, Vec2};

use crate::egui_app::controller::EguiController;
use crate::egui_app::state::WorkspaceTab;

/// Smallest usable window for the workspace layout.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(1080.0, 720.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create a new egui app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let mut controller = EguiController::new();
        controller
            .load_configuration()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_workspace(&mut self, ctx: &egui::Context) {
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.controller.ui.active_tab {
            WorkspaceTab::Predict => self.render_predict_panel(ui),
            WorkspaceTab::History => self.render_history_panel(ctx, ui),
            WorkspaceTab::Records => self.render_records_panel(ctx, ui),
            WorkspaceTab::Models => self.render_models_panel(ctx, ui),
            WorkspaceTab::Users => self.render_users_panel(ctx, ui),
        });
        self.render_dataset_modal(ctx);
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        if self.controller.has_background_work() {
            ctx.request_repaint_after(std::time::Duration::from_millis(120));
        }
        if self.controller.is_signed_in() {
            self.render_workspace(ctx);
        } else {
            self.render_login(ctx);
        }
        if let Some(prompt) = self.controller.ui.confirm.clone() {
            self.render_confirm_prompt(ctx, &prompt);
        }
        progress_overlay::render_progress_overlay(ctx, &mut self.controller.ui.progress);
    }
}
