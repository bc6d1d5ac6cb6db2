use super::PredictionRowView;

/// Filter options offered on the admin records screen, derived from a wide
/// fetch of existing predictions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilterOptions {
    /// Distinct model names, sorted.
    pub models: Vec<String>,
    /// Distinct prediction labels in canonical BI-RADS order, unknown
    /// labels after.
    pub results: Vec<String>,
}

/// UI state for the admin Records tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordsUiState {
    pub rows: Vec<PredictionRowView>,
    pub total: u64,
    /// 1-based page index.
    pub page: u32,
    pub loading: bool,
    pub loaded_once: bool,
    /// Search box contents; applied on submit.
    pub search_input: String,
    /// Search string the current rows were fetched with.
    pub applied_search: String,
    pub model_filter: Option<String>,
    pub result_filter: Option<String>,
    pub filter_options: RecordFilterOptions,
    pub options_loaded: bool,
    /// Row opened in the detail window.
    pub detail: Option<PredictionRowView>,
}
