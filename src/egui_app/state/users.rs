use crate::session::UserRole;

/// One account row in the admin user table.
#[derive(Clone, Debug, PartialEq)]
pub struct UserRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// `local`, `google`, or `facebook`.
    pub auth_provider: String,
    pub is_revoked: bool,
    pub confirmed: bool,
    pub created_label: String,
}

/// Edit window for one account.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserEditState {
    pub open: bool,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role_admin: bool,
    pub is_revoked: bool,
    pub confirmed: bool,
    /// True while the fresh detail fetch is pending.
    pub loading: bool,
    pub saving: bool,
    pub last_error: Option<String>,
}

impl UserEditState {
    /// Prefill the form from a table row; the detail fetch refreshes it.
    pub fn open_for(row: &UserRowView) -> Self {
        Self {
            open: true,
            user_id: row.id.clone(),
            email: row.email.clone(),
            name: row.name.clone(),
            role_admin: row.role.is_admin(),
            is_revoked: row.is_revoked,
            confirmed: row.confirmed,
            loading: true,
            saving: false,
            last_error: None,
        }
    }

    pub fn role(&self) -> UserRole {
        if self.role_admin {
            UserRole::Admin
        } else {
            UserRole::Doctor
        }
    }
}

/// UI state for the admin Users tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UsersUiState {
    pub rows: Vec<UserRowView>,
    pub total: u64,
    /// 1-based page index.
    pub page: u32,
    pub loading: bool,
    pub loaded_once: bool,
    pub search_input: String,
    pub applied_search: String,
    pub role_filter: Option<UserRole>,
    pub provider_filter: Option<String>,
    pub revoked_filter: Option<bool>,
    pub edit: UserEditState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> UserRowView {
        UserRowView {
            id: "u-3".into(),
            name: "Grace".into(),
            email: "grace@clinic.test".into(),
            role: UserRole::Doctor,
            auth_provider: "local".into(),
            is_revoked: false,
            confirmed: true,
            created_label: "2026-01-12".into(),
        }
    }

    #[test]
    fn open_for_prefills_from_the_row() {
        let edit = UserEditState::open_for(&row());
        assert!(edit.open);
        assert!(edit.loading);
        assert_eq!(edit.user_id, "u-3");
        assert_eq!(edit.name, "Grace");
        assert_eq!(edit.role(), UserRole::Doctor);
        assert!(edit.confirmed);
    }

    #[test]
    fn role_follows_the_admin_toggle() {
        let mut edit = UserEditState::open_for(&row());
        edit.role_admin = true;
        assert_eq!(edit.role(), UserRole::Admin);
    }
}
