//! Model registry management: listing, registration, editing, activation.

use crate::api::ApiError;
use crate::api::models::{self, ModelUpdate, NewModel};
use crate::api::uploads::{self, UploadKind, UploadTicketRequest};
use crate::egui_app::state::{ConfirmPrompt, ProgressOverlayState, ProgressTaskKind};
use crate::egui_app::ui::style::StatusTone;
use crate::egui_app::view_model;

use super::jobs::{
    ModelActivateResult, ModelCreateJob, ModelDeleteResult, ModelSaveResult, ModelsResult,
};
use super::{EguiController, PAGE_SIZE, total_pages};

impl EguiController {
    pub fn refresh_models(&mut self) {
        self.ui.models.loading = true;
        self.jobs.begin_models_refresh(self.api.clone());
    }

    pub fn set_models_page(&mut self, page: u32) {
        let pages = total_pages(self.ui.models.rows.len() as u64, PAGE_SIZE);
        self.ui.models.page = page.clamp(1, pages);
    }

    pub fn open_model_create_form(&mut self) {
        let form = &mut self.ui.models.form;
        *form = Default::default();
        form.open = true;
        form.focus_name_requested = true;
    }

    pub fn open_model_edit_form(&mut self, row_id: &str) {
        let Some(row) = self.ui.models.rows.iter().find(|row| row.id == row_id) else {
            return;
        };
        let (id, name, version) = (row.id.clone(), row.name.clone(), row.version.clone());
        let accuracy_input = row
            .accuracy_label
            .strip_suffix('%')
            .unwrap_or_default()
            .to_string();
        let form = &mut self.ui.models.form;
        *form = Default::default();
        form.open = true;
        form.editing = Some(id);
        form.name = name;
        form.version = version;
        form.accuracy_input = accuracy_input;
        form.focus_name_requested = true;
    }

    pub fn close_model_form(&mut self) {
        if self.ui.models.form.saving {
            return;
        }
        self.ui.models.form = Default::default();
    }

    pub fn pick_model_artifact(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select model artifact")
            .add_filter("PyTorch model", &["pt"])
            .pick_file();
        if let Some(path) = picked {
            self.ui.models.form.artifact = Some(path);
            self.ui.models.form.last_error = None;
        }
    }

    pub fn pick_model_labels(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select class labels")
            .add_filter("Labels file", &["txt"])
            .pick_file();
        if let Some(path) = picked {
            self.ui.models.form.labels = Some(path);
        }
    }

    pub fn clear_model_labels(&mut self) {
        self.ui.models.form.labels = None;
    }

    /// Validate the form. Edits go straight to the backend; creation is
    /// parameterized by the activate flag and goes through the prompt.
    pub fn submit_model_form(&mut self) {
        if self.ui.models.form.saving {
            return;
        }
        if let Err(message) = self.ui.models.form.validate() {
            self.ui.models.form.last_error = Some(message);
            return;
        }
        self.ui.models.form.last_error = None;

        if let Some(id) = self.ui.models.form.editing.clone() {
            let update = ModelUpdate {
                name: self.ui.models.form.name.trim().to_string(),
                version: self.ui.models.form.version.trim().to_string(),
                accuracy: self.ui.models.form.parsed_accuracy().unwrap_or(None),
            };
            self.ui.models.form.saving = true;
            self.set_status("Saving model...", StatusTone::Busy);
            self.jobs.begin_model_edit(self.api.clone(), id, update);
            return;
        }

        self.ui.confirm = Some(ConfirmPrompt::CreateModel {
            name: self.ui.models.form.name.trim().to_string(),
            activate: self.ui.models.form.activate_immediately,
        });
    }

    pub(in crate::egui_app::controller) fn create_model_confirmed(&mut self, activate: bool) {
        if self.jobs.model_save_in_progress() {
            return;
        }
        let Some(artifact_path) = self.ui.models.form.artifact.clone() else {
            self.ui.models.form.last_error = Some("Pick a model artifact (.pt) to upload".into());
            return;
        };
        let artifact_ticket =
            match UploadTicketRequest::for_file(&artifact_path, UploadKind::ModelArtifact) {
                Ok(request) => request,
                Err(err) => {
                    self.ui.models.form.last_error = Some(err.to_string());
                    return;
                }
            };
        let labels = match self.ui.models.form.labels.clone() {
            Some(path) => match UploadTicketRequest::for_file(&path, UploadKind::ModelLabels) {
                Ok(request) => Some((path, request)),
                Err(err) => {
                    self.ui.models.form.last_error = Some(err.to_string());
                    return;
                }
            },
            None => None,
        };

        let job = ModelCreateJob {
            client: self.api.clone(),
            name: self.ui.models.form.name.trim().to_string(),
            version: self.ui.models.form.version.trim().to_string(),
            accuracy: self.ui.models.form.parsed_accuracy().unwrap_or(None),
            artifact_path,
            artifact_ticket,
            labels,
            activate,
        };
        self.ui.models.form.saving = true;
        self.ui.progress = ProgressOverlayState::new(
            ProgressTaskKind::ModelSave,
            "Uploading model artifact",
            job.artifact_ticket.size_bytes as usize,
            false,
        );
        self.ui
            .progress
            .set_detail(Some(job.artifact_ticket.file_name.clone()));
        self.set_status("Registering model...", StatusTone::Busy);
        self.jobs.begin_model_create(job);
    }

    pub fn request_delete_model(&mut self, row_id: &str) {
        let Some(row) = self.ui.models.rows.iter().find(|row| row.id == row_id) else {
            return;
        };
        if row.is_active {
            self.notify(
                "The active model cannot be deleted. Activate another model first.",
                StatusTone::Warning,
            );
            return;
        }
        self.ui.confirm = Some(ConfirmPrompt::DeleteModel {
            id: row.id.clone(),
            name: row.name.clone(),
        });
    }

    pub(in crate::egui_app::controller) fn delete_model_confirmed(&mut self, id: String, name: String) {
        self.set_status(format!("Deleting \"{name}\"..."), StatusTone::Busy);
        self.jobs.begin_model_delete(self.api.clone(), id);
    }

    pub fn request_activate_model(&mut self, row_id: &str) {
        let Some(row) = self.ui.models.rows.iter().find(|row| row.id == row_id) else {
            return;
        };
        if row.is_active {
            return;
        }
        self.ui.confirm = Some(ConfirmPrompt::ActivateModel {
            id: row.id.clone(),
            name: row.name.clone(),
        });
    }

    pub(in crate::egui_app::controller) fn activate_model_confirmed(
        &mut self,
        id: String,
        name: String,
    ) {
        self.ui.progress = ProgressOverlayState::new(
            ProgressTaskKind::ModelActivate,
            format!("Activating \"{name}\""),
            0,
            false,
        );
        self.set_status(format!("Activating \"{name}\"..."), StatusTone::Busy);
        self.jobs.begin_model_activate(self.api.clone(), id);
    }

    pub(in crate::egui_app::controller) fn apply_models_loaded(&mut self, result: ModelsResult) {
        self.jobs.clear_models_refresh();
        self.ui.models.loading = false;
        match result.result {
            Ok(records) => {
                self.ui.models.rows = view_model::model_rows(&records);
                let pages = total_pages(self.ui.models.rows.len() as u64, PAGE_SIZE);
                self.ui.models.page = self.ui.models.page.clamp(1, pages);
                self.ui.models.loaded_once = true;
            }
            Err(err) => self.report_api_error("Could not load models", &err),
        }
    }

    pub(in crate::egui_app::controller) fn apply_model_saved(&mut self, result: ModelSaveResult) {
        self.jobs.clear_model_save();
        self.ui.models.form.saving = false;
        self.ui.progress.reset();
        match result.result {
            Ok(()) => {
                let message = if result.created {
                    "Model registered"
                } else {
                    "Model updated"
                };
                self.ui.models.form = Default::default();
                self.notify(message, StatusTone::Info);
                self.refresh_models();
                self.refresh_model_banner();
            }
            Err(err) => {
                self.ui.models.form.last_error = Some(err.to_string());
                self.report_api_error("Could not save model", &err);
            }
        }
    }

    pub(in crate::egui_app::controller) fn apply_model_deleted(&mut self, result: ModelDeleteResult) {
        self.jobs.clear_model_delete();
        match result.result {
            Ok(()) => {
                self.notify("Model deleted", StatusTone::Info);
                self.refresh_models();
            }
            Err(err) => self.report_api_error("Could not delete model", &err),
        }
    }

    pub(in crate::egui_app::controller) fn apply_model_activated(
        &mut self,
        result: ModelActivateResult,
    ) {
        self.jobs.clear_model_activate();
        self.ui.progress.reset();
        match result.result {
            Ok(()) => {
                self.notify("Active model switched", StatusTone::Info);
                self.refresh_models();
                self.refresh_model_banner();
            }
            Err(err) => self.report_api_error("Could not activate model", &err),
        }
    }
}

/// Upload the artifact (and optional labels) against signed tickets, then
/// register the model. Only the artifact upload reports progress; labels
/// files are small.
pub(super) fn run_model_create_job(
    job: &ModelCreateJob,
    progress: impl FnMut(u64, u64),
) -> Result<(), ApiError> {
    let artifact_ticket = uploads::request_upload_ticket(&job.client, &job.artifact_ticket)?;
    uploads::put_file(&artifact_ticket, &job.artifact_path, progress)?;
    let artifact = uploads::uploaded_file(&artifact_ticket, &job.artifact_ticket);

    let mut labels_url = None;
    let mut labels_key = None;
    if let Some((path, ticket_request)) = &job.labels {
        let ticket = uploads::request_upload_ticket(&job.client, ticket_request)?;
        uploads::put_file(&ticket, path, |_, _| {})?;
        let stored = uploads::uploaded_file(&ticket, ticket_request);
        labels_url = Some(stored.url);
        labels_key = Some(stored.key);
    }

    let model = NewModel {
        name: job.name.clone(),
        version: job.version.clone(),
        accuracy: job.accuracy,
        model_url: artifact.url,
        model_key: artifact.key,
        model_original_name: artifact.original_name,
        labels_url,
        labels_key,
        is_active: job.activate,
    };
    models::create_model(&job.client, &model)
}
