use crate::dataset::ClassDistribution;

/// Dashboard cards and chart on the Models & Stats tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsUiState {
    /// Total prediction count across all doctors.
    pub total_predictions: u64,
    /// Predictions recorded today (local calendar date).
    pub today: u64,
    /// Predictions recorded yesterday.
    pub yesterday: u64,
    /// Average confidence across stored predictions, as a percentage.
    pub average_confidence: f64,
    /// Per-class image counts for the distribution chart.
    pub distribution: Option<ClassDistribution>,
    pub loading: bool,
    pub loaded_once: bool,
}

impl StatsUiState {
    /// Today's count relative to yesterday, for the delta caption.
    pub fn today_delta(&self) -> i64 {
        self.today as i64 - self.yesterday as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_signed() {
        let mut stats = StatsUiState {
            today: 4,
            yesterday: 9,
            ..StatsUiState::default()
        };
        assert_eq!(stats.today_delta(), -5);
        stats.yesterday = 1;
        assert_eq!(stats.today_delta(), 3);
    }
}
