use crate::dataset::{ClassDistribution, PartitionRatio};

/// Lifecycle of the dataset export modal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DatasetModalPhase {
    #[default]
    Closed,
    /// Class statistics fetch in flight.
    Loading,
    /// Statistics shown, ratio adjustable.
    Ready,
    /// Confirmation gate showing the derived percentages.
    Confirming,
    /// Export request in flight; the close control is disabled.
    Exporting,
}

/// State of the dataset export modal.
///
/// Transitions are driven by the controller on the UI thread; the helpers
/// below refuse transitions from the wrong phase so a stale job message
/// cannot corrupt the lifecycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetModalState {
    pub phase: DatasetModalPhase,
    pub ratio: PartitionRatio,
    pub distribution: Option<ClassDistribution>,
    /// Error shown inside the modal; also mirrored to the status area once.
    pub last_error: Option<String>,
}

impl DatasetModalState {
    pub fn is_open(&self) -> bool {
        self.phase != DatasetModalPhase::Closed
    }

    /// Open the modal: statistics start loading and the ratio resets.
    pub fn open(&mut self) {
        *self = Self {
            phase: DatasetModalPhase::Loading,
            ..Self::default()
        };
    }

    /// Close and release all transient state. Refused while exporting.
    pub fn close(&mut self) -> bool {
        if self.phase == DatasetModalPhase::Exporting {
            return false;
        }
        *self = Self::default();
        true
    }

    pub fn stats_loaded(&mut self, distribution: ClassDistribution) {
        if self.phase != DatasetModalPhase::Loading {
            return;
        }
        self.distribution = Some(distribution);
        self.last_error = None;
        self.phase = DatasetModalPhase::Ready;
    }

    /// Statistics failure keeps the modal in Loading; close/reopen retries.
    pub fn stats_failed(&mut self, message: String) {
        if self.phase != DatasetModalPhase::Loading {
            return;
        }
        self.last_error = Some(message);
    }

    pub fn request_export(&mut self) {
        if self.phase == DatasetModalPhase::Ready {
            self.phase = DatasetModalPhase::Confirming;
        }
    }

    pub fn cancel_confirmation(&mut self) {
        if self.phase == DatasetModalPhase::Confirming {
            self.phase = DatasetModalPhase::Ready;
        }
    }

    pub fn begin_export(&mut self) {
        if self.phase == DatasetModalPhase::Confirming {
            self.last_error = None;
            self.phase = DatasetModalPhase::Exporting;
        }
    }

    /// Export failure returns to Ready with the ratio preserved.
    pub fn export_failed(&mut self, message: String) {
        if self.phase != DatasetModalPhase::Exporting {
            return;
        }
        self.last_error = Some(message);
        self.phase = DatasetModalPhase::Ready;
    }

    /// Export success closes the modal and releases transient state.
    pub fn export_succeeded(&mut self) {
        if self.phase != DatasetModalPhase::Exporting {
            return;
        }
        *self = Self::default();
    }
}
