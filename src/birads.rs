//! BI-RADS assessment categories used across prediction and dataset screens.

use std::cmp::Ordering;
use std::fmt;

/// The six assessment categories the classifier distinguishes.
///
/// Variants are declared in canonical BI-RADS order, so the derived `Ord`
/// matches the clinical numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BiRadsCategory {
    /// BI-RADS 0: incomplete, additional imaging needed.
    Incomplete,
    /// BI-RADS 1: negative.
    Negative,
    /// BI-RADS 2: benign finding.
    Benign,
    /// BI-RADS 3: probably benign.
    ProbablyBenign,
    /// BI-RADS 4: suspicious abnormality.
    Suspicious,
    /// BI-RADS 5: highly suggestive of malignancy.
    HighlySuggestive,
}

impl BiRadsCategory {
    /// All categories in canonical order.
    pub const ALL: [BiRadsCategory; 6] = [
        BiRadsCategory::Incomplete,
        BiRadsCategory::Negative,
        BiRadsCategory::Benign,
        BiRadsCategory::ProbablyBenign,
        BiRadsCategory::Suspicious,
        BiRadsCategory::HighlySuggestive,
    ];

    /// Numeric BI-RADS assessment (0 through 5).
    pub fn number(self) -> u8 {
        match self {
            BiRadsCategory::Incomplete => 0,
            BiRadsCategory::Negative => 1,
            BiRadsCategory::Benign => 2,
            BiRadsCategory::ProbablyBenign => 3,
            BiRadsCategory::Suspicious => 4,
            BiRadsCategory::HighlySuggestive => 5,
        }
    }

    /// Category for a classifier output index, when it is in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label as the backend spells it, e.g. `BI-RADS 3`.
    pub fn label(self) -> String {
        format!("BI-RADS {}", self.number())
    }

    /// Parse a backend label. Tolerates case and separator variations such as
    /// `birads3` or `BI RADS 3`.
    pub fn from_label(label: &str) -> Option<Self> {
        let compact: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let digits = compact.strip_prefix("birads")?;
        match digits.parse::<usize>().ok()? {
            n @ 0..=5 => Self::from_index(n),
            _ => None,
        }
    }

    /// Short assessment name.
    pub fn assessment(self) -> &'static str {
        match self {
            BiRadsCategory::Incomplete => "Incomplete",
            BiRadsCategory::Negative => "Negative",
            BiRadsCategory::Benign => "Benign",
            BiRadsCategory::ProbablyBenign => "Probably benign",
            BiRadsCategory::Suspicious => "Suspicious",
            BiRadsCategory::HighlySuggestive => "Highly suggestive of malignancy",
        }
    }

    /// One-line clinical guidance shown with prediction results.
    pub fn guidance(self) -> &'static str {
        match self {
            BiRadsCategory::Incomplete => {
                "Assessment is incomplete; additional imaging or prior studies are needed."
            }
            BiRadsCategory::Negative => "No abnormality found; continue routine screening.",
            BiRadsCategory::Benign => {
                "A clearly benign finding; continue routine screening."
            }
            BiRadsCategory::ProbablyBenign => {
                "Malignancy very unlikely; short-interval follow-up is suggested."
            }
            BiRadsCategory::Suspicious => {
                "Suspicious abnormality; tissue diagnosis should be considered."
            }
            BiRadsCategory::HighlySuggestive => {
                "High probability of malignancy; appropriate action should be taken."
            }
        }
    }
}

impl fmt::Display for BiRadsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BI-RADS {}", self.number())
    }
}

/// Order labels for filter lists: known categories first in canonical order,
/// anything else after them, lexically.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (BiRadsCategory::from_label(a), BiRadsCategory::from_label(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Pick the predicted category and its confidence from the classifier's
/// probability vector. Probabilities beyond the six categories are ignored;
/// ties go to the earlier category.
pub fn predicted_from_probabilities(probabilities: &[f64]) -> Option<(BiRadsCategory, f64)> {
    let mut best: Option<(BiRadsCategory, f64)> = None;
    for (index, &probability) in probabilities.iter().enumerate().take(BiRadsCategory::ALL.len()) {
        let category = BiRadsCategory::from_index(index)?;
        match best {
            Some((_, peak)) if probability <= peak => {}
            _ => best = Some((category, probability)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_clinical_numbering() {
        let labels: Vec<String> = BiRadsCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec![
                "BI-RADS 0", "BI-RADS 1", "BI-RADS 2", "BI-RADS 3", "BI-RADS 4", "BI-RADS 5"
            ]
        );
    }

    #[test]
    fn parses_label_variants() {
        assert_eq!(
            BiRadsCategory::from_label("BI-RADS 4"),
            Some(BiRadsCategory::Suspicious)
        );
        assert_eq!(
            BiRadsCategory::from_label("birads0"),
            Some(BiRadsCategory::Incomplete)
        );
        assert_eq!(
            BiRadsCategory::from_label("BI RADS 5"),
            Some(BiRadsCategory::HighlySuggestive)
        );
        assert_eq!(BiRadsCategory::from_label("BI-RADS 6"), None);
        assert_eq!(BiRadsCategory::from_label("normal"), None);
    }

    #[test]
    fn unknown_labels_sort_after_known_ones() {
        let mut labels = vec![
            "unclassified".to_string(),
            "BI-RADS 5".to_string(),
            "BI-RADS 0".to_string(),
            "artifact".to_string(),
        ];
        labels.sort_by(|a, b| compare_labels(a, b));
        assert_eq!(labels, vec!["BI-RADS 0", "BI-RADS 5", "artifact", "unclassified"]);
    }

    #[test]
    fn index_round_trips_through_number() {
        for (idx, category) in BiRadsCategory::ALL.iter().enumerate() {
            assert_eq!(category.number() as usize, idx);
            assert_eq!(BiRadsCategory::from_index(idx), Some(*category));
        }
        assert_eq!(BiRadsCategory::from_index(6), None);
    }

    #[test]
    fn argmax_picks_the_peak_probability() {
        let probs = [0.01, 0.04, 0.05, 0.7, 0.15, 0.05];
        let (category, confidence) = predicted_from_probabilities(&probs).unwrap();
        assert_eq!(category, BiRadsCategory::ProbablyBenign);
        assert!((confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn argmax_ties_go_to_the_earlier_category() {
        let probs = [0.5, 0.5];
        let (category, _) = predicted_from_probabilities(&probs).unwrap();
        assert_eq!(category, BiRadsCategory::Incomplete);
        assert_eq!(predicted_from_probabilities(&[]), None);
    }

    #[test]
    fn argmax_ignores_probabilities_past_the_six_categories() {
        let probs = [0.1, 0.2, 0.1, 0.1, 0.1, 0.1, 0.9];
        let (category, confidence) = predicted_from_probabilities(&probs).unwrap();
        assert_eq!(category, BiRadsCategory::Negative);
        assert!((confidence - 0.2).abs() < 1e-9);
    }
}
