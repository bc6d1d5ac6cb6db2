//! Per-class image counts for the training corpus.

use std::collections::BTreeMap;

use crate::birads::{self, BiRadsCategory};

/// One bar in the distribution chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCount {
    pub label: String,
    /// `None` for labels outside the canonical six.
    pub category: Option<BiRadsCategory>,
    pub count: u64,
}

/// Class distribution of the dataset as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDistribution {
    total_images: u64,
    counts: BTreeMap<String, u64>,
}

impl ClassDistribution {
    pub fn new(total_images: u64, counts: BTreeMap<String, u64>) -> Self {
        Self {
            total_images,
            counts,
        }
    }

    pub fn total_images(&self) -> u64 {
        self.total_images
    }

    pub fn count_for(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Rows for the chart: the six BI-RADS categories always appear in
    /// canonical order, absent ones with a zero count. Labels the backend
    /// reports outside the canonical set follow, lexically.
    pub fn chart_rows(&self) -> Vec<ClassCount> {
        let mut rows: Vec<ClassCount> = BiRadsCategory::ALL
            .iter()
            .map(|category| {
                let label = category.label();
                ClassCount {
                    count: self.count_for(&label),
                    category: Some(*category),
                    label,
                }
            })
            .collect();

        let mut extras: Vec<&String> = self
            .counts
            .keys()
            .filter(|label| BiRadsCategory::from_label(label).is_none())
            .collect();
        extras.sort_by(|a, b| birads::compare_labels(a, b));
        rows.extend(extras.into_iter().map(|label| ClassCount {
            label: label.clone(),
            category: None,
            count: self.count_for(label),
        }));
        rows
    }

    /// Largest bar value, used to scale the chart. Never zero.
    pub fn max_count(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0).max(1)
    }
}
