//! Sign-in, sign-out, and session persistence.

use crate::api::ApiError;
use crate::api::auth::LoginRequest;
use crate::config;
use crate::egui_app::state::{UiState, WorkspaceTab};
use crate::egui_app::ui::style::StatusTone;
use crate::session::{Session, SessionEvent};

use super::EguiController;
use super::jobs::SignInResult;

impl EguiController {
    /// Submit the login form. No-op while a sign-in is already in flight
    /// or the form is incomplete.
    pub fn submit_login(&mut self) {
        if !self.ui.login.can_submit() {
            return;
        }
        let request = LoginRequest {
            email: self.ui.login.email.trim().to_string(),
            password: self.ui.login.password.clone(),
        };
        self.ui.login.signing_in = true;
        self.ui.login.last_error = None;
        self.set_status("Signing in...", StatusTone::Busy);
        self.jobs.begin_sign_in(self.api.clone(), request);
    }

    pub(in crate::egui_app::controller) fn apply_signed_in(&mut self, result: SignInResult) {
        self.jobs.clear_sign_in();
        self.ui.login.signing_in = false;
        match result.result {
            Ok(session) => {
                self.persist_session(&session);
                self.install_session(session);
            }
            Err(err) => {
                // A 401 here is bad credentials, not an expired session.
                let message = match err {
                    ApiError::Unauthorized => "Email or password is incorrect".to_string(),
                    other => other.to_string(),
                };
                self.ui.login.last_error = Some(message.clone());
                self.notify(format!("Sign-in failed: {message}"), StatusTone::Error);
            }
        }
    }

    /// Put a session into the observable store and move to the workspace.
    /// The subscription forwards store events into the controller's channel,
    /// which is drained on the UI thread each frame.
    fn install_session(&mut self, session: Session) {
        let profile = session.profile.clone();
        let tx = self.session_events_tx.clone();
        let subscription = self.session.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });
        self.session_subscription = Some(subscription);
        self.session.sign_in(session);

        self.ui.login.reset();
        self.ui.active_tab = WorkspaceTab::Predict;
        let display = if profile.name.trim().is_empty() {
            profile.email.clone()
        } else {
            profile.name.clone()
        };
        self.notify(
            format!("Signed in as {display} ({})", profile.role.label()),
            StatusTone::Info,
        );
        self.refresh_model_banner();
    }

    /// Restore the last session when the config still names a profile and
    /// the token store holds a token for it. No network validation; a stale
    /// token surfaces as a 401 on the first call.
    pub(in crate::egui_app::controller) fn restore_persisted_session(&mut self) {
        let Some(profile) = self.config.profile.clone() else {
            return;
        };
        let Some(store) = &self.token_store else {
            return;
        };
        match store.get() {
            Ok(Some(token)) => {
                self.install_session(Session { token, profile });
            }
            Ok(None) => {
                // Token was wiped outside the app; drop the orphan profile.
                self.config.profile = None;
                if let Err(err) = config::save(&self.config) {
                    tracing::warn!("Failed to update config: {err}");
                }
            }
            Err(err) => {
                tracing::warn!("Could not read persisted session token: {err}");
            }
        }
    }

    /// Explicit sign-out from the session box. The store notifies
    /// subscribers and tears the subscriptions down; the forwarded event
    /// resets the UI when drained.
    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.clear_persisted_session();
    }

    /// A call answered 401: the token is stale. End the session with an
    /// explanatory notice instead of surfacing the raw error.
    pub(in crate::egui_app::controller) fn handle_session_expired(&mut self) {
        if self.sign_out_notice.is_none() {
            self.sign_out_notice = Some("Session expired. Sign in again.".to_string());
        }
        self.session.sign_out();
        self.clear_persisted_session();
    }

    fn clear_persisted_session(&mut self) {
        if let Some(store) = &self.token_store
            && let Err(err) = store.delete()
        {
            tracing::warn!("Failed to delete persisted session token: {err}");
        }
        if self.config.profile.take().is_some()
            && let Err(err) = config::save(&self.config)
        {
            tracing::warn!("Failed to update config: {err}");
        }
    }

    fn persist_session(&mut self, session: &Session) {
        if let Some(store) = &self.token_store
            && let Err(err) = store.set(&session.token)
        {
            tracing::warn!("Failed to persist session token: {err}");
        }
        self.config.profile = Some(session.profile.clone());
        if let Err(err) = config::save(&self.config) {
            tracing::warn!("Failed to save config: {err}");
        }
    }

    pub(in crate::egui_app::controller) fn drain_session_events(&mut self) {
        while let Ok(event) = self.session_events.try_recv() {
            match event {
                SessionEvent::SignedIn(profile) => {
                    tracing::info!(email = %profile.email, role = profile.role.wire_name(), "session started");
                }
                SessionEvent::SignedOut => self.reset_after_sign_out(),
            }
        }
    }

    /// All workspace state is scoped to a session; signing out drops it.
    fn reset_after_sign_out(&mut self) {
        self.session_subscription = None;
        self.ui = UiState::default();
        self.ui.login.focus_email_requested = true;
        let notice = self
            .sign_out_notice
            .take()
            .unwrap_or_else(|| "Signed out".to_string());
        if notice != "Signed out" {
            self.ui.login.last_error = Some(notice.clone());
            self.notify(notice, StatusTone::Warning);
        } else {
            self.notify(notice, StatusTone::Info);
        }
    }
}
