//! Shared state types consumed by the egui renderer.

mod dataset_modal;
mod history;
mod login;
mod models;
mod predict;
mod progress;
mod prompts;
mod records;
mod stats;
mod status;
mod users;

pub use dataset_modal::*;
pub use history::*;
pub use login::*;
pub use models::*;
pub use predict::*;
pub use progress::*;
pub use prompts::*;
pub use records::*;
pub use stats::*;
pub use status::*;
pub use users::*;

use crate::session::UserRole;

/// Workspace tabs along the top bar. Admin-only tabs are hidden for doctors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkspaceTab {
    Predict,
    History,
    Records,
    Models,
    Users,
}

impl WorkspaceTab {
    pub const ALL: [WorkspaceTab; 5] = [
        WorkspaceTab::Predict,
        WorkspaceTab::History,
        WorkspaceTab::Records,
        WorkspaceTab::Models,
        WorkspaceTab::Users,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkspaceTab::Predict => "Predict",
            WorkspaceTab::History => "History",
            WorkspaceTab::Records => "Records",
            WorkspaceTab::Models => "Models & Stats",
            WorkspaceTab::Users => "Users",
        }
    }

    pub fn visible_for(self, role: UserRole) -> bool {
        match self {
            WorkspaceTab::Predict | WorkspaceTab::History => true,
            WorkspaceTab::Records | WorkspaceTab::Models | WorkspaceTab::Users => role.is_admin(),
        }
    }
}

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    pub login: LoginUiState,
    pub active_tab: WorkspaceTab,
    pub predict: PredictUiState,
    pub history: HistoryUiState,
    pub records: RecordsUiState,
    pub models: ModelsUiState,
    pub stats: StatsUiState,
    pub users: UsersUiState,
    pub dataset: DatasetModalState,
    /// Overlay for long-running tasks.
    pub progress: ProgressOverlayState,
    /// Pending destructive/creation confirmation, if any.
    pub confirm: Option<ConfirmPrompt>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            login: LoginUiState::default(),
            active_tab: WorkspaceTab::Predict,
            predict: PredictUiState::default(),
            history: HistoryUiState::default(),
            records: RecordsUiState::default(),
            models: ModelsUiState::default(),
            stats: StatsUiState::default(),
            users: UsersUiState::default(),
            dataset: DatasetModalState::default(),
            progress: ProgressOverlayState::default(),
            confirm: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_tabs_are_hidden_for_doctors() {
        let doctor: Vec<_> = WorkspaceTab::ALL
            .iter()
            .filter(|tab| tab.visible_for(UserRole::Doctor))
            .collect();
        assert_eq!(doctor.len(), 2);
        let admin: Vec<_> = WorkspaceTab::ALL
            .iter()
            .filter(|tab| tab.visible_for(UserRole::Admin))
            .collect();
        assert_eq!(admin.len(), 5);
    }
}
