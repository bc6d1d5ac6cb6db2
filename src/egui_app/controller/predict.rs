//! Upload-and-classify flow on the Predict tab.

use crate::api::models::{self, PredictRequest};
use crate::api::uploads::{self, UploadKind, UploadTicketRequest};
use crate::api::ApiError;
use crate::birads;
use crate::egui_app::state::{PredictionOutcome, ProgressOverlayState, ProgressTaskKind};
use crate::egui_app::ui::style::StatusTone;

use super::EguiController;
use super::jobs::{ModelBannerResult, PredictJob, PredictResult, UploadProgressUpdate};

impl EguiController {
    pub fn refresh_model_banner(&mut self) {
        self.jobs.begin_model_banner(self.api.clone());
    }

    /// Pick the mammogram to classify. Clears a previous outcome so a
    /// stale result never sits next to a new file name.
    pub fn pick_mammogram(&mut self) {
        if self.jobs.predict_in_progress() {
            return;
        }
        let picked = rfd::FileDialog::new()
            .set_title("Select mammogram")
            .add_filter("Mammogram image", &["jpg", "jpeg", "png"])
            .pick_file();
        if let Some(path) = picked {
            self.ui.predict.selected_image = Some(path);
            self.ui.predict.outcome = None;
            self.ui.predict.last_error = None;
        }
    }

    pub fn submit_predict(&mut self) {
        if self.jobs.predict_in_progress() {
            return;
        }
        let Some(profile) = self.profile() else {
            return;
        };
        let Some(image_path) = self.ui.predict.selected_image.clone() else {
            self.ui.predict.last_error = Some("Select a mammogram first".to_string());
            return;
        };
        if !self.ui.predict.banner.available {
            self.ui.predict.last_error =
                Some("No model is available for classification".to_string());
            return;
        }
        let ticket_request =
            match UploadTicketRequest::for_file(&image_path, UploadKind::MammogramImage) {
                Ok(request) => request,
                Err(err) => {
                    self.ui.predict.last_error = Some(err.to_string());
                    return;
                }
            };

        // Url and key are filled in by the worker once the upload lands.
        let request = PredictRequest {
            doctor_id: profile.user_id.clone(),
            image_url: String::new(),
            image_original_name: ticket_request.file_name.clone(),
            image_key: String::new(),
            model_name: self.ui.predict.banner.name.clone(),
        };

        self.ui.predict.last_error = None;
        self.ui.predict.outcome = None;
        self.ui.progress = ProgressOverlayState::new(
            ProgressTaskKind::Predict,
            "Uploading mammogram",
            ticket_request.size_bytes as usize,
            false,
        );
        self.ui
            .progress
            .set_detail(Some(ticket_request.file_name.clone()));
        self.set_status("Classifying mammogram...", StatusTone::Busy);
        self.jobs.begin_predict(PredictJob {
            client: self.api.clone(),
            request,
            image_path,
            ticket_request,
        });
    }

    pub(in crate::egui_app::controller) fn apply_model_banner(&mut self, result: ModelBannerResult) {
        self.jobs.clear_model_banner();
        let banner = &mut self.ui.predict.banner;
        banner.loaded = true;
        match result.info {
            Ok(info) => {
                if !info.name.trim().is_empty() {
                    banner.name = info.name;
                }
                if !info.version.trim().is_empty() {
                    banner.version = info.version;
                }
            }
            Err(err) => tracing::warn!("Could not load active model info: {err}"),
        }
        match result.available {
            Ok(available) => banner.available = available,
            Err(err) => {
                banner.available = false;
                tracing::warn!("Could not check model availability: {err}");
            }
        }
    }

    pub(in crate::egui_app::controller) fn apply_upload_progress(
        &mut self,
        update: UploadProgressUpdate,
    ) {
        if self.ui.progress.task == Some(update.task) {
            self.ui
                .progress
                .set_counts(update.total as usize, update.sent as usize);
        }
    }

    pub(in crate::egui_app::controller) fn apply_predicted(&mut self, result: PredictResult) {
        self.jobs.clear_predict();
        self.ui.progress.reset();
        match result.result {
            Ok(probabilities) => {
                let Some((category, confidence)) =
                    birads::predicted_from_probabilities(&probabilities)
                else {
                    self.ui.predict.last_error =
                        Some("Backend returned no usable probabilities".to_string());
                    self.notify("Classification returned no result", StatusTone::Error);
                    return;
                };
                self.ui.predict.outcome = Some(PredictionOutcome {
                    probabilities,
                    category,
                    confidence,
                });
                self.ui.predict.last_error = None;
                // The new record belongs on the next History fetch.
                self.ui.history.loaded_once = false;
                self.notify(
                    format!(
                        "Classified as {} ({:.1}% confidence)",
                        category.label(),
                        confidence * 100.0
                    ),
                    StatusTone::Info,
                );
            }
            Err(err) => {
                self.ui.predict.last_error = Some(err.to_string());
                self.report_api_error("Classification failed", &err);
            }
        }
    }
}

/// Ticket, PUT, then predict, reporting upload progress along the way.
pub(super) fn run_predict_job(
    job: &PredictJob,
    progress: impl FnMut(u64, u64),
) -> Result<Vec<f64>, ApiError> {
    let ticket = uploads::request_upload_ticket(&job.client, &job.ticket_request)?;
    uploads::put_file(&ticket, &job.image_path, progress)?;
    let stored = uploads::uploaded_file(&ticket, &job.ticket_request);
    let request = PredictRequest {
        image_url: stored.url,
        image_key: stored.key,
        ..job.request.clone()
    };
    models::predict(&job.client, &request)
}
