//! Account administration on the Users tab.

use crate::api::users::{UserQuery, UserUpdate};
use crate::egui_app::state::{ConfirmPrompt, UserEditState};
use crate::egui_app::ui::style::StatusTone;
use crate::egui_app::view_model;
use crate::session::UserRole;

use super::jobs::{UserDeleteResult, UserDetailResult, UserSaveResult, UsersResult};
use super::{EguiController, PAGE_SIZE};

impl EguiController {
    pub fn refresh_users(&mut self) {
        let query = UserQuery {
            page: self.ui.users.page.max(1),
            page_size: PAGE_SIZE,
            search: self.ui.users.applied_search.clone(),
            role: self.ui.users.role_filter,
            auth_provider: self.ui.users.provider_filter.clone(),
            is_revoked: self.ui.users.revoked_filter,
        };
        self.ui.users.loading = true;
        self.jobs.begin_users(self.api.clone(), query);
    }

    pub fn submit_users_search(&mut self) {
        self.ui.users.applied_search = self.ui.users.search_input.trim().to_string();
        self.ui.users.page = 1;
        self.refresh_users();
    }

    pub fn set_users_page(&mut self, page: u32) {
        self.ui.users.page = page.max(1);
        self.refresh_users();
    }

    pub fn set_users_role_filter(&mut self, role: Option<UserRole>) {
        self.ui.users.role_filter = role;
        self.ui.users.page = 1;
        self.refresh_users();
    }

    pub fn set_users_provider_filter(&mut self, provider: Option<String>) {
        self.ui.users.provider_filter = provider;
        self.ui.users.page = 1;
        self.refresh_users();
    }

    pub fn set_users_revoked_filter(&mut self, revoked: Option<bool>) {
        self.ui.users.revoked_filter = revoked;
        self.ui.users.page = 1;
        self.refresh_users();
    }

    /// Open the edit window prefilled from the row, then refresh it from
    /// the detail endpoint.
    pub fn open_user_editor(&mut self, row_id: &str) {
        let Some(row) = self.ui.users.rows.iter().find(|row| row.id == row_id) else {
            return;
        };
        self.ui.users.edit = UserEditState::open_for(row);
        self.jobs
            .begin_user_detail(self.api.clone(), row.id.clone());
    }

    pub fn close_user_editor(&mut self) {
        if self.ui.users.edit.saving {
            return;
        }
        self.ui.users.edit = UserEditState::default();
    }

    pub fn submit_user_edit(&mut self) {
        if self.ui.users.edit.saving || self.ui.users.edit.loading {
            return;
        }
        let edit = &self.ui.users.edit;
        if edit.name.trim().is_empty() {
            self.ui.users.edit.last_error = Some("Name cannot be empty".into());
            return;
        }
        let update = UserUpdate {
            name: edit.name.trim().to_string(),
            role: edit.role(),
            is_revoked: edit.is_revoked,
            confirmed: edit.confirmed,
        };
        let id = edit.user_id.clone();
        self.ui.users.edit.saving = true;
        self.ui.users.edit.last_error = None;
        self.set_status("Saving account...", StatusTone::Busy);
        self.jobs.begin_user_save(self.api.clone(), id, update);
    }

    pub fn request_delete_user(&mut self, row_id: &str) {
        let Some(row) = self.ui.users.rows.iter().find(|row| row.id == row_id) else {
            return;
        };
        if self
            .profile()
            .is_some_and(|profile| profile.user_id == row.id)
        {
            self.notify("You cannot delete your own account", StatusTone::Warning);
            return;
        }
        self.ui.confirm = Some(ConfirmPrompt::DeleteUser {
            id: row.id.clone(),
            email: row.email.clone(),
        });
    }

    pub(in crate::egui_app::controller) fn delete_user_confirmed(&mut self, id: String, email: String) {
        self.set_status(format!("Deleting {email}..."), StatusTone::Busy);
        self.jobs.begin_user_delete(self.api.clone(), id);
    }

    pub(in crate::egui_app::controller) fn apply_users_loaded(&mut self, result: UsersResult) {
        self.jobs.clear_users();
        self.ui.users.loading = false;
        match result.result {
            Ok(page) => {
                self.ui.users.rows = view_model::user_rows(&page.users);
                self.ui.users.total = page.total_users;
                self.ui.users.page = result.query.page;
                self.ui.users.loaded_once = true;
                self.set_status(
                    format!("{} accounts", page.total_users),
                    StatusTone::Idle,
                );
            }
            Err(err) => self.report_api_error("Could not load accounts", &err),
        }
    }

    pub(in crate::egui_app::controller) fn apply_user_detail_loaded(
        &mut self,
        result: UserDetailResult,
    ) {
        self.jobs.clear_user_detail();
        if !self.ui.users.edit.open || self.ui.users.edit.user_id != result.user_id {
            return;
        }
        self.ui.users.edit.loading = false;
        match result.result {
            Ok(record) => {
                let edit = &mut self.ui.users.edit;
                edit.email = record.email;
                edit.name = record.name;
                edit.role_admin = record.role.is_admin();
                edit.is_revoked = record.is_revoked;
                edit.confirmed = record.confirmed;
            }
            Err(err) => {
                // The prefilled row values remain editable.
                self.ui.users.edit.last_error = Some(err.to_string());
                self.report_api_error("Could not load account detail", &err);
            }
        }
    }

    pub(in crate::egui_app::controller) fn apply_user_saved(&mut self, result: UserSaveResult) {
        self.jobs.clear_user_save();
        self.ui.users.edit.saving = false;
        match result.result {
            Ok(()) => {
                self.ui.users.edit = UserEditState::default();
                self.notify("Account updated", StatusTone::Info);
                self.refresh_users();
            }
            Err(err) => {
                self.ui.users.edit.last_error = Some(err.to_string());
                self.report_api_error("Could not save account", &err);
            }
        }
    }

    pub(in crate::egui_app::controller) fn apply_user_deleted(&mut self, result: UserDeleteResult) {
        self.jobs.clear_user_delete();
        match result.result {
            Ok(()) => {
                self.notify("Account deleted", StatusTone::Info);
                self.refresh_users();
            }
            Err(err) => self.report_api_error("Could not delete account", &err),
        }
    }
}
