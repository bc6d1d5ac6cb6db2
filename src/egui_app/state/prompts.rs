/// Pending confirmation rendered as an anchored modal window.
///
/// Destructive actions and model creation all funnel through one prompt;
/// creation carries its "activate immediately" flag so a single confirmation
/// covers both registration paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmPrompt {
    DeletePrediction {
        id: String,
        image_key: String,
        image_name: String,
    },
    CreateModel {
        name: String,
        activate: bool,
    },
    DeleteModel {
        id: String,
        name: String,
    },
    ActivateModel {
        id: String,
        name: String,
    },
    DeleteUser {
        id: String,
        email: String,
    },
}

impl ConfirmPrompt {
    /// Window title for the prompt.
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmPrompt::DeletePrediction { .. } => "Delete prediction",
            ConfirmPrompt::CreateModel { .. } => "Register model",
            ConfirmPrompt::DeleteModel { .. } => "Delete model",
            ConfirmPrompt::ActivateModel { .. } => "Activate model",
            ConfirmPrompt::DeleteUser { .. } => "Delete user",
        }
    }

    /// Body copy for the prompt.
    pub fn message(&self) -> String {
        match self {
            ConfirmPrompt::DeletePrediction { image_name, .. } => format!(
                "Delete the prediction for \"{image_name}\"? The stored image is removed as well."
            ),
            ConfirmPrompt::CreateModel {
                name,
                activate: true,
            } => format!("Register \"{name}\" and activate it immediately?"),
            ConfirmPrompt::CreateModel {
                name,
                activate: false,
            } => format!("Register \"{name}\"? The current active model stays in service."),
            ConfirmPrompt::DeleteModel { name, .. } => {
                format!("Delete model \"{name}\"? Its stored artifact is removed as well.")
            }
            ConfirmPrompt::ActivateModel { name, .. } => {
                format!("Make \"{name}\" the serving model? The current model is deactivated.")
            }
            ConfirmPrompt::DeleteUser { email, .. } => {
                format!("Delete the account {email}? This cannot be undone.")
            }
        }
    }

    /// Whether the confirm button should render in the destructive color.
    pub fn destructive(&self) -> bool {
        matches!(
            self,
            ConfirmPrompt::DeletePrediction { .. }
                | ConfirmPrompt::DeleteModel { .. }
                | ConfirmPrompt::DeleteUser { .. }
        )
    }

    /// Label of the confirm button.
    pub fn confirm_label(&self) -> &'static str {
        match self {
            ConfirmPrompt::DeletePrediction { .. }
            | ConfirmPrompt::DeleteModel { .. }
            | ConfirmPrompt::DeleteUser { .. } => "Delete",
            ConfirmPrompt::CreateModel { activate: true, .. } => "Register and activate",
            ConfirmPrompt::CreateModel {
                activate: false, ..
            } => "Register",
            ConfirmPrompt::ActivateModel { .. } => "Activate",
        }
    }
}
