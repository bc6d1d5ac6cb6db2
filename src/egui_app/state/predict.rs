use std::path::PathBuf;

use crate::birads::BiRadsCategory;

/// Active-model banner shown above the upload control.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelBanner {
    /// Display name of the serving model.
    pub name: String,
    /// Display version of the serving model.
    pub version: String,
    /// Whether the backend reports a model ready for inference.
    pub available: bool,
    /// True once the first banner fetch has answered.
    pub loaded: bool,
}

impl Default for ModelBanner {
    fn default() -> Self {
        Self {
            name: "Unknown".into(),
            version: "v0.0".into(),
            available: false,
            loaded: false,
        }
    }
}

/// Classification returned for the uploaded mammogram.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionOutcome {
    /// Raw per-class probabilities in canonical BI-RADS order.
    pub probabilities: Vec<f64>,
    /// Category with the highest probability.
    pub category: BiRadsCategory,
    /// Probability of the predicted category, in `[0, 1]`.
    pub confidence: f64,
}

/// UI state for the doctor's Predict tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictUiState {
    pub banner: ModelBanner,
    /// Image chosen through the file dialog, pending upload.
    pub selected_image: Option<PathBuf>,
    /// Result of the last completed prediction.
    pub outcome: Option<PredictionOutcome>,
    /// Validation or request error shown inline.
    pub last_error: Option<String>,
}

impl PredictUiState {
    /// Name of the selected file for display.
    pub fn selected_image_name(&self) -> Option<String> {
        self.selected_image
            .as_ref()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .map(|name| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_defaults_to_unknown_model() {
        let banner = ModelBanner::default();
        assert_eq!(banner.name, "Unknown");
        assert_eq!(banner.version, "v0.0");
        assert!(!banner.available);
        assert!(!banner.loaded);
    }

    #[test]
    fn selected_image_name_strips_directories() {
        let state = PredictUiState {
            selected_image: Some(PathBuf::from("/scans/patient/mlo_left.png")),
            ..PredictUiState::default()
        };
        assert_eq!(state.selected_image_name().unwrap(), "mlo_left.png");
    }
}
