use splitsync_common::HostError;

use crate::geometry::WindowId;

/// How the host's windows were brought in line with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileMode {
    /// Existing windows matched the target shape and were reused.
    #[default]
    Patch,
    /// Shape differed; all but one window were closed and the tree rebuilt.
    Rebuild,
}

/// A buffer that could not be opened or shown.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferFailure {
    pub window: WindowId,
    pub path: String,
    pub error: HostError,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconcileReport {
    pub mode: ReconcileMode,
    pub created: usize,
    pub closed: usize,
    pub split_failures: usize,
    pub buffer_failures: Vec<BufferFailure>,
    /// Window bound to each target leaf, in traversal order. `None` where
    /// a split could not be created.
    pub windows: Vec<Option<WindowId>>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.split_failures == 0 && self.buffer_failures.is_empty()
    }

    pub fn structural_ops(&self) -> usize {
        self.created + self.closed
    }
}
