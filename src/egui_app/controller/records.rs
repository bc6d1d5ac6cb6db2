//! Admin-wide prediction records: search, filters, deletion.

use crate::api::predictions::{self, PredictionQuery};
use crate::api::{ApiClient, ApiError};
use crate::birads;
use crate::egui_app::state::{ConfirmPrompt, RecordFilterOptions};
use crate::egui_app::ui::style::StatusTone;
use crate::egui_app::view_model;

use super::jobs::{PredictionDeleteResult, RecordFiltersResult, RecordsResult};
use super::{EguiController, PAGE_SIZE};

/// How many records the filter-option fetch pulls in one go.
const FILTER_SCAN_LIMIT: u32 = 10_000;

impl EguiController {
    pub fn refresh_records(&mut self) {
        let query = PredictionQuery {
            page: self.ui.records.page.max(1),
            limit: PAGE_SIZE,
            search: self.ui.records.applied_search.clone(),
            model_filter: self.ui.records.model_filter.clone(),
            result_filter: self.ui.records.result_filter.clone(),
        };
        self.ui.records.loading = true;
        self.jobs.begin_records(self.api.clone(), query);
    }

    pub fn submit_records_search(&mut self) {
        self.ui.records.applied_search = self.ui.records.search_input.trim().to_string();
        self.ui.records.page = 1;
        self.refresh_records();
    }

    pub fn set_records_page(&mut self, page: u32) {
        self.ui.records.page = page.max(1);
        self.refresh_records();
    }

    pub fn set_records_model_filter(&mut self, model: Option<String>) {
        self.ui.records.model_filter = model;
        self.ui.records.page = 1;
        self.refresh_records();
    }

    pub fn set_records_result_filter(&mut self, result: Option<String>) {
        self.ui.records.result_filter = result;
        self.ui.records.page = 1;
        self.refresh_records();
    }

    pub fn refresh_record_filters(&mut self) {
        self.jobs.begin_record_filters(self.api.clone());
    }

    pub fn open_record_detail(&mut self, row_id: &str) {
        self.ui.records.detail = self
            .ui
            .records
            .rows
            .iter()
            .find(|row| row.id == row_id)
            .cloned();
    }

    pub fn close_record_detail(&mut self) {
        self.ui.records.detail = None;
    }

    pub fn request_delete_prediction(&mut self, row_id: &str) {
        let Some(row) = self.ui.records.rows.iter().find(|row| row.id == row_id) else {
            return;
        };
        self.ui.confirm = Some(ConfirmPrompt::DeletePrediction {
            id: row.id.clone(),
            image_key: row.image_key.clone(),
            image_name: row.image_name.clone(),
        });
    }

    pub(in crate::egui_app::controller) fn delete_prediction_confirmed(
        &mut self,
        id: String,
        image_key: String,
    ) {
        self.set_status("Deleting prediction...", StatusTone::Busy);
        self.jobs
            .begin_prediction_delete(self.api.clone(), id, image_key);
    }

    pub(in crate::egui_app::controller) fn apply_records_loaded(&mut self, result: RecordsResult) {
        self.jobs.clear_records();
        self.ui.records.loading = false;
        match result.result {
            Ok(page) => {
                self.ui.records.rows = view_model::prediction_rows(&page.items);
                self.ui.records.total = page.total;
                self.ui.records.page = result.query.page;
                self.ui.records.loaded_once = true;
                self.set_status(
                    format!("{} matching records", page.total),
                    StatusTone::Idle,
                );
            }
            Err(err) => self.report_api_error("Could not load records", &err),
        }
    }

    pub(in crate::egui_app::controller) fn apply_record_filters_loaded(
        &mut self,
        result: RecordFiltersResult,
    ) {
        self.jobs.clear_record_filters();
        match result.result {
            Ok(options) => {
                self.ui.records.filter_options = options;
                self.ui.records.options_loaded = true;
            }
            Err(err) => tracing::warn!("Could not derive record filters: {err}"),
        }
    }

    pub(in crate::egui_app::controller) fn apply_prediction_deleted(
        &mut self,
        result: PredictionDeleteResult,
    ) {
        self.jobs.clear_prediction_delete();
        match result.result {
            Ok(()) => {
                self.ui.records.detail = None;
                self.notify("Prediction deleted", StatusTone::Info);
                self.refresh_records();
            }
            Err(err) => self.report_api_error("Could not delete prediction", &err),
        }
    }
}

/// Derive the Records filter options from a wide fetch. Model names sort
/// lexically; result labels sort in assessment order with unknown labels
/// after.
pub(super) fn run_record_filters_job(client: &ApiClient) -> Result<RecordFilterOptions, ApiError> {
    let query = PredictionQuery {
        page: 1,
        limit: FILTER_SCAN_LIMIT,
        ..PredictionQuery::default()
    };
    let page = predictions::fetch_predictions(client, &query)?;

    let mut models: Vec<String> = Vec::new();
    let mut results: Vec<String> = Vec::new();
    for record in &page.items {
        let model = record.model_name.trim();
        if !model.is_empty() && !models.iter().any(|known| known == model) {
            models.push(model.to_string());
        }
        let result = record.prediction_result.trim();
        if !result.is_empty() && !results.iter().any(|known| known == result) {
            results.push(result.to_string());
        }
    }
    models.sort();
    results.sort_by(|a, b| birads::compare_labels(a, b));
    Ok(RecordFilterOptions { models, results })
}
