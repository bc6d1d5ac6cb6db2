//! The doctor's own prediction history.

use crate::egui_app::ui::style::StatusTone;
use crate::egui_app::view_model;

use super::EguiController;
use super::jobs::HistoryResult;

impl EguiController {
    pub fn load_history_page(&mut self, page: u32) {
        let Some(profile) = self.profile() else {
            return;
        };
        let page = page.max(1);
        self.ui.history.loading = true;
        self.jobs
            .begin_history(self.api.clone(), profile.user_id, page);
    }

    pub fn open_history_detail(&mut self, row_id: &str) {
        self.ui.history.detail = self
            .ui
            .history
            .rows
            .iter()
            .find(|row| row.id == row_id)
            .cloned();
    }

    pub fn close_history_detail(&mut self) {
        self.ui.history.detail = None;
    }

    pub(in crate::egui_app::controller) fn apply_history_loaded(&mut self, result: HistoryResult) {
        self.jobs.clear_history();
        self.ui.history.loading = false;
        match result.result {
            Ok(page) => {
                self.ui.history.rows = view_model::prediction_rows(&page.items);
                self.ui.history.total = page.total;
                self.ui.history.page = result.page;
                self.ui.history.loaded_once = true;
                self.set_status(
                    format!("{} predictions on record", page.total),
                    StatusTone::Idle,
                );
            }
            Err(err) => self.report_api_error("Could not load history", &err),
        }
    }
}
