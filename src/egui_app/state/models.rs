use std::path::PathBuf;

/// One model row in the admin table.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRowView {
    pub id: String,
    pub name: String,
    pub version: String,
    /// Accuracy formatted as a percentage, or a dash.
    pub accuracy_label: String,
    pub artifact_name: String,
    pub created_label: String,
    pub is_active: bool,
}

/// Create/edit form for a model registration.
///
/// Artifact and labels pickers only apply when creating; editing is limited
/// to name, version, and accuracy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelFormState {
    pub open: bool,
    /// `Some(id)` when editing an existing registration.
    pub editing: Option<String>,
    pub name: String,
    pub version: String,
    /// Accuracy input as typed; validated on submit.
    pub accuracy_input: String,
    /// `.pt` artifact pending upload.
    pub artifact: Option<PathBuf>,
    /// Optional class-labels `.txt` pending upload.
    pub labels: Option<PathBuf>,
    /// Register the model as active immediately after creation.
    pub activate_immediately: bool,
    pub focus_name_requested: bool,
    pub saving: bool,
    pub last_error: Option<String>,
}

impl ModelFormState {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Parse the accuracy field. Empty means not reported.
    pub fn parsed_accuracy(&self) -> Result<Option<f64>, String> {
        let trimmed = self.accuracy_input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if (0.0..=100.0).contains(&value) => Ok(Some(value)),
            Ok(_) => Err("Accuracy must be between 0 and 100".into()),
            Err(_) => Err("Accuracy must be a number".into()),
        }
    }

    /// Validate the form for submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Model name is required".into());
        }
        if self.version.trim().is_empty() {
            return Err("Version is required".into());
        }
        self.parsed_accuracy()?;
        if !self.is_editing() && self.artifact.is_none() {
            return Err("Pick a model artifact (.pt) to upload".into());
        }
        Ok(())
    }
}

/// UI state for the admin Models & Stats tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelsUiState {
    pub rows: Vec<ModelRowView>,
    /// 1-based page index over the client-side paged rows.
    pub page: u32,
    pub loading: bool,
    pub loaded_once: bool,
    pub form: ModelFormState,
}
