//! Dataset export modal: class statistics, ratio confirmation, download.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::api::dataset::{self, DatasetExportRequest};
use crate::api::{ApiClient, ApiError};
use crate::dataset::archive::{self, ArchiveError};
use crate::egui_app::state::DatasetModalPhase;
use crate::egui_app::ui::style::StatusTone;

use super::EguiController;
use super::jobs::{DatasetExportResult, DatasetStatsResult};

/// Failure modes of one export attempt.
#[derive(Debug, Error)]
pub(crate) enum DatasetExportError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl EguiController {
    /// Open the modal and start the class-statistics fetch.
    pub fn open_dataset_modal(&mut self) {
        if self.ui.dataset.is_open() {
            return;
        }
        self.ui.dataset.open();
        self.set_status("Loading dataset statistics...", StatusTone::Busy);
        self.jobs.begin_dataset_stats(self.api.clone());
    }

    /// Close the modal. Refused while an export is in flight.
    pub fn close_dataset_modal(&mut self) -> bool {
        self.ui.dataset.close()
    }

    pub fn request_dataset_export(&mut self) {
        self.ui.dataset.request_export();
    }

    pub fn cancel_dataset_confirmation(&mut self) {
        self.ui.dataset.cancel_confirmation();
    }

    /// Start the export with the confirmed ratio. The request body is
    /// derived here, at confirmation time, not when the modal opened.
    pub fn confirm_dataset_export(&mut self) {
        if self.ui.dataset.phase != DatasetModalPhase::Confirming
            || self.jobs.dataset_export_in_progress()
        {
            return;
        }
        let download_dir = match self.config.export.resolved_download_dir() {
            Ok(dir) => dir,
            Err(err) => {
                self.ui.dataset.cancel_confirmation();
                self.ui.dataset.last_error = Some(err.to_string());
                self.notify(
                    format!("No download directory available: {err}"),
                    StatusTone::Error,
                );
                return;
            }
        };
        let request = DatasetExportRequest::from(self.ui.dataset.ratio);
        self.ui.dataset.begin_export();
        self.set_status(
            format!("Exporting dataset ({})...", self.ui.dataset.ratio.summary()),
            StatusTone::Busy,
        );
        self.jobs
            .begin_dataset_export(self.api.clone(), request, download_dir);
    }

    pub(in crate::egui_app::controller) fn apply_dataset_stats_loaded(
        &mut self,
        result: DatasetStatsResult,
    ) {
        self.jobs.clear_dataset_stats();
        match result.result {
            Ok(distribution) => {
                self.ui.dataset.stats_loaded(distribution);
                self.set_status("Dataset statistics loaded", StatusTone::Idle);
            }
            Err(err) => {
                self.ui.dataset.stats_failed(err.to_string());
                self.report_api_error("Could not load dataset statistics", &err);
            }
        }
    }

    pub(in crate::egui_app::controller) fn apply_dataset_exported(
        &mut self,
        result: DatasetExportResult,
    ) {
        self.jobs.clear_dataset_export();
        match result.result {
            Ok(path) => {
                self.ui.dataset.export_succeeded();
                self.notify(
                    format!("Dataset exported to {}", path.display()),
                    StatusTone::Info,
                );
            }
            Err(err) => {
                self.ui.dataset.export_failed(err.to_string());
                if let DatasetExportError::Api(api_err) = &err {
                    self.report_api_error("Dataset export failed", api_err);
                } else {
                    self.notify(format!("Dataset export failed: {err}"), StatusTone::Error);
                }
            }
        }
    }
}

/// Stream the archive into a staging file, validate it, then move it into
/// place as `data.zip` under the download directory.
pub(super) fn run_dataset_export_job(
    client: &ApiClient,
    request: &DatasetExportRequest,
    download_dir: &Path,
) -> Result<PathBuf, DatasetExportError> {
    let mut staged = archive::stage_archive(download_dir)?;
    let bytes = dataset::export_dataset(client, request, &mut staged)?;
    tracing::info!(bytes, "dataset archive downloaded");
    Ok(archive::finalize_export(staged, download_dir)?)
}
