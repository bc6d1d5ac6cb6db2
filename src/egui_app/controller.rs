//! Bridges the backend API and session state to the egui renderer.
//!
//! Every network call runs on a background thread owned by
//! [`jobs::ControllerJobs`]; results come back as messages drained once per
//! frame by [`EguiController::poll_background_jobs`]. All state mutation
//! happens on the UI thread.

mod dashboard;
mod dataset_export;
mod history;
mod jobs;
mod models;
mod predict;
mod records;
mod session;
mod users;

use std::sync::mpsc::{Receiver, Sender};

use crate::api::{ApiClient, ApiError};
use crate::config::{self, AppConfig};
use crate::egui_app::state::*;
use crate::egui_app::ui::style::{self, StatusTone};
use crate::session::{Profile, SessionEvent, SessionStore, SessionTokenStore, SubscriptionId, UserRole};

use jobs::{ControllerJobs, JobMessage};

/// Rows per page for every server-paged table.
pub(crate) const PAGE_SIZE: u32 = 8;

/// Maintains app state and bridges backend calls to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    config: AppConfig,
    session: SessionStore,
    api: ApiClient,
    token_store: Option<SessionTokenStore>,
    jobs: ControllerJobs,
    session_events_tx: Sender<SessionEvent>,
    session_events: Receiver<SessionEvent>,
    session_subscription: Option<SubscriptionId>,
    /// Reason shown when the next sign-out event is drained (e.g. expiry).
    sign_out_notice: Option<String>,
}

impl EguiController {
    pub fn new() -> Self {
        let config = AppConfig::default();
        let session = SessionStore::new();
        let api = ApiClient::new(config.backend.base_url.clone(), session.clone());
        let (session_events_tx, session_events) = std::sync::mpsc::channel();
        Self {
            ui: UiState::default(),
            config,
            session,
            api,
            token_store: None,
            jobs: ControllerJobs::new(),
            session_events_tx,
            session_events,
            session_subscription: None,
            sign_out_notice: None,
        }
    }

    /// Load persisted config, build the API client, and restore the last
    /// session when the token store still holds a matching token.
    pub fn load_configuration(&mut self) -> Result<(), config::ConfigError> {
        self.config = config::load_or_default()?;
        self.api = ApiClient::new(self.config.backend.base_url.clone(), self.session.clone());
        match SessionTokenStore::new() {
            Ok(store) => self.token_store = Some(store),
            Err(err) => {
                tracing::warn!("Token store unavailable; sessions will not persist: {err}");
                self.token_store = None;
            }
        }
        self.ui.login.focus_email_requested = true;
        self.restore_persisted_session();
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.session.profile()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.session.profile().map(|profile| profile.role)
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Tabs the signed-in role may see, in display order.
    pub fn visible_tabs(&self) -> Vec<WorkspaceTab> {
        let Some(role) = self.role() else {
            return Vec::new();
        };
        WorkspaceTab::ALL
            .iter()
            .copied()
            .filter(|tab| tab.visible_for(role))
            .collect()
    }

    /// Switch tabs, lazily fetching the data the tab shows the first time
    /// it is opened.
    pub fn select_tab(&mut self, tab: WorkspaceTab) {
        let Some(role) = self.role() else {
            return;
        };
        if !tab.visible_for(role) {
            return;
        }
        self.ui.active_tab = tab;
        self.prime_tab(tab);
    }

    fn prime_tab(&mut self, tab: WorkspaceTab) {
        match tab {
            WorkspaceTab::Predict => {
                if !self.ui.predict.banner.loaded {
                    self.refresh_model_banner();
                }
            }
            WorkspaceTab::History => {
                if !self.ui.history.loaded_once {
                    self.load_history_page(1);
                }
            }
            WorkspaceTab::Records => {
                if !self.ui.records.loaded_once {
                    self.refresh_records();
                }
                if !self.ui.records.options_loaded {
                    self.refresh_record_filters();
                }
            }
            WorkspaceTab::Models => {
                if !self.ui.models.loaded_once {
                    self.refresh_models();
                }
                if !self.ui.stats.loaded_once {
                    self.refresh_dashboard_stats();
                }
            }
            WorkspaceTab::Users => {
                if !self.ui.users.loaded_once {
                    self.refresh_users();
                }
            }
        }
    }

    /// True while any background worker is running; drives frame scheduling.
    pub fn has_background_work(&self) -> bool {
        self.jobs.any_in_progress()
    }

    /// Exposed for the export-flow integration tests.
    pub fn dataset_export_in_progress(&self) -> bool {
        self.jobs.dataset_export_in_progress()
    }

    /// Drain background job messages and session events. Called once per
    /// frame before rendering.
    pub fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(_) => break,
            };
            match message {
                JobMessage::SignedIn(result) => self.apply_signed_in(result),
                JobMessage::ModelBannerLoaded(result) => self.apply_model_banner(result),
                JobMessage::UploadProgress(update) => self.apply_upload_progress(update),
                JobMessage::Predicted(result) => self.apply_predicted(result),
                JobMessage::HistoryLoaded(result) => self.apply_history_loaded(result),
                JobMessage::RecordsLoaded(result) => self.apply_records_loaded(result),
                JobMessage::RecordFiltersLoaded(result) => {
                    self.apply_record_filters_loaded(result)
                }
                JobMessage::PredictionDeleted(result) => self.apply_prediction_deleted(result),
                JobMessage::ModelsLoaded(result) => self.apply_models_loaded(result),
                JobMessage::ModelSaved(result) => self.apply_model_saved(result),
                JobMessage::ModelDeleted(result) => self.apply_model_deleted(result),
                JobMessage::ModelActivated(result) => self.apply_model_activated(result),
                JobMessage::StatsLoaded(result) => self.apply_stats_loaded(result),
                JobMessage::UsersLoaded(result) => self.apply_users_loaded(result),
                JobMessage::UserDetailLoaded(result) => self.apply_user_detail_loaded(result),
                JobMessage::UserSaved(result) => self.apply_user_saved(result),
                JobMessage::UserDeleted(result) => self.apply_user_deleted(result),
                JobMessage::DatasetStatsLoaded(result) => self.apply_dataset_stats_loaded(result),
                JobMessage::DatasetExported(result) => self.apply_dataset_exported(result),
            }
        }
        self.drain_session_events();
    }

    /// Run the action behind the pending confirmation prompt.
    pub fn confirm_prompt_accepted(&mut self) {
        let Some(prompt) = self.ui.confirm.take() else {
            return;
        };
        match prompt {
            ConfirmPrompt::DeletePrediction { id, image_key, .. } => {
                self.delete_prediction_confirmed(id, image_key)
            }
            ConfirmPrompt::CreateModel { activate, .. } => {
                self.create_model_confirmed(activate)
            }
            ConfirmPrompt::DeleteModel { id, name } => self.delete_model_confirmed(id, name),
            ConfirmPrompt::ActivateModel { id, name } => self.activate_model_confirmed(id, name),
            ConfirmPrompt::DeleteUser { id, email } => self.delete_user_confirmed(id, email),
        }
    }

    pub fn dismiss_confirm_prompt(&mut self) {
        self.ui.confirm = None;
    }

    pub(in crate::egui_app::controller) fn set_status(
        &mut self,
        text: impl Into<String>,
        tone: StatusTone,
    ) {
        let (label, color) = style::status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = label;
        self.ui.status.badge_color = color;
    }

    /// Set the status line and append it to the rolling footer log. Every
    /// user-visible notification goes through here exactly once.
    pub(in crate::egui_app::controller) fn notify(
        &mut self,
        text: impl Into<String>,
        tone: StatusTone,
    ) {
        let text = text.into();
        match tone {
            StatusTone::Error | StatusTone::Warning => tracing::warn!("{text}"),
            _ => tracing::info!("{text}"),
        }
        self.ui.status.push_log(text.clone());
        self.set_status(text, tone);
    }

    /// Surface a failed call. A 401 means the token is stale, so the
    /// session ends instead of showing the raw error.
    pub(in crate::egui_app::controller) fn report_api_error(
        &mut self,
        action: &str,
        error: &ApiError,
    ) {
        if matches!(error, ApiError::Unauthorized) {
            self.handle_session_expired();
            return;
        }
        self.notify(format!("{action}: {error}"), StatusTone::Error);
    }
}

/// Number of pages needed for `total` rows, at least 1.
pub(crate) fn total_pages(total: u64, page_size: u32) -> u32 {
    if total == 0 {
        return 1;
    }
    total.div_ceil(page_size as u64).min(u32::MAX as u64) as u32
}

/// Index range of `page` (1-based) over a client-side paged row list.
pub(crate) fn page_bounds(len: usize, page: u32, page_size: u32) -> std::ops::Range<usize> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    let start = start.min(len);
    let end = start.saturating_add(page_size as usize).min(len);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up_and_never_hits_zero() {
        assert_eq!(total_pages(0, PAGE_SIZE), 1);
        assert_eq!(total_pages(8, PAGE_SIZE), 1);
        assert_eq!(total_pages(9, PAGE_SIZE), 2);
        assert_eq!(total_pages(17, PAGE_SIZE), 3);
    }

    #[test]
    fn page_bounds_clamp_to_the_row_count() {
        assert_eq!(page_bounds(20, 1, 8), 0..8);
        assert_eq!(page_bounds(20, 3, 8), 16..20);
        assert_eq!(page_bounds(20, 9, 8), 20..20);
        assert_eq!(page_bounds(0, 1, 8), 0..0);
    }
}
