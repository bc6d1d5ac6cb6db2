/// Modal progress indicator for slow tasks.
/// Identifies the long-running task responsible for updating the progress overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressTaskKind {
    /// Uploading a mammogram and waiting for the backend classification.
    Predict,
    /// Uploading a model artifact (and optional labels) and registering it.
    ModelSave,
    /// Switching the backend's active model.
    ModelActivate,
}

use std::time::Instant;

/// UI state for the progress overlay and its counters.
#[derive(Clone, Debug, Default)]
pub struct ProgressOverlayState {
    /// Whether the overlay is visible.
    pub visible: bool,
    /// When true, the modal overlay is rendered (otherwise progress is status-bar only).
    pub modal: bool,
    /// The task currently driving the progress overlay (when visible).
    pub task: Option<ProgressTaskKind>,
    /// Title text for the overlay.
    pub title: String,
    /// Optional detail text for the overlay.
    pub detail: Option<String>,
    /// Completed units (bytes for uploads).
    pub completed: usize,
    /// Total units.
    pub total: usize,
    /// Whether cancel is allowed.
    pub cancelable: bool,
    /// Whether the user requested cancellation.
    pub cancel_requested: bool,
    /// Last time the overlay was updated.
    pub last_update_at: Option<Instant>,
    /// Last time progress advanced.
    pub last_progress_at: Option<Instant>,
}

impl ProgressOverlayState {
    /// Create and show a progress overlay with the provided title and total unit count.
    pub fn new(
        task: ProgressTaskKind,
        title: impl Into<String>,
        total: usize,
        cancelable: bool,
    ) -> Self {
        let now = Instant::now();
        Self {
            visible: true,
            modal: true,
            task: Some(task),
            title: title.into(),
            detail: None,
            completed: 0,
            total,
            cancelable,
            cancel_requested: false,
            last_update_at: Some(now),
            last_progress_at: Some(now),
        }
    }

    /// Reset the overlay back to its default (hidden) state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Update the detail text and refresh the timestamp.
    pub fn set_detail(&mut self, detail: Option<String>) {
        self.detail = detail;
        self.last_update_at = Some(Instant::now());
    }

    /// Update total/completed counts and refresh timestamps.
    pub fn set_counts(&mut self, total: usize, completed: usize) {
        if self.total != total || self.completed != completed {
            self.last_progress_at = Some(Instant::now());
        }
        self.total = total;
        self.completed = completed;
        self.last_update_at = Some(Instant::now());
    }

    /// Return completion in the range `[0.0, 1.0]`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed as f32 / self.total as f32).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProgressOverlayState, ProgressTaskKind};

    #[test]
    fn progress_fraction_handles_zero_total() {
        let progress = ProgressOverlayState::new(ProgressTaskKind::Predict, "Task", 0, false);
        assert_eq!(progress.fraction(), 0.0);
    }

    #[test]
    fn progress_reset_clears_visibility() {
        let mut progress = ProgressOverlayState::new(ProgressTaskKind::ModelSave, "Task", 2, true);
        progress.completed = 3;
        assert!(progress.fraction() <= 1.0);
        progress.reset();
        assert!(!progress.visible);
        assert_eq!(progress.task, None);
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.total, 0);
    }
}
