use crate::birads::BiRadsCategory;

/// One prediction row as rendered in the history and records tables.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionRowView {
    pub id: String,
    /// Doctor who ran the prediction, when the backend reports one.
    pub doctor_id: Option<String>,
    pub image_url: String,
    pub image_name: String,
    /// Object-store key, needed when deleting the record.
    pub image_key: String,
    /// Timestamp formatted for display.
    pub created_label: String,
    pub model_name: String,
    /// Raw label reported by the backend, e.g. `BI-RADS 3`.
    pub result_label: String,
    /// Parsed category when the label is one of the canonical six.
    pub category: Option<BiRadsCategory>,
    /// Confidence formatted as a percentage.
    pub probability_label: String,
}

/// UI state for the doctor's History tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryUiState {
    pub rows: Vec<PredictionRowView>,
    pub total: u64,
    /// 1-based page index.
    pub page: u32,
    pub loading: bool,
    /// True once the first page has been fetched for this session.
    pub loaded_once: bool,
    /// Row opened in the detail window.
    pub detail: Option<PredictionRowView>,
}
