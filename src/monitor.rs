//! Progress reporting and cooperative cancellation.
//!
//! Long running operations accept a `&dyn Monitor`. A `None` progress value
//! means "indeterminate" (e.g. while results are being merged).

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Observer of a long running computation.
pub trait Monitor: Sync {
    /// Report completion in percent, or `None` when indeterminate.
    fn set_progress(&self, _percent: Option<u8>) {}

    /// Whether the computation should stop at its next check.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Monitor that ignores progress and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Monitor for Silent {}

/// Shareable cancellation flag that also records the last reported progress.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
    progress: Arc<AtomicU8>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Last reported progress. Indeterminate reports are stored as `u8::MAX`.
    pub fn progress(&self) -> Option<u8> {
        match self.progress.load(Ordering::Acquire) {
            u8::MAX => None,
            p => Some(p),
        }
    }
}

impl Monitor for CancelFlag {
    fn set_progress(&self, percent: Option<u8>) {
        self.progress
            .store(percent.unwrap_or(u8::MAX), Ordering::Release);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_visible_through_clones() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn records_progress() {
        let flag = CancelFlag::new();
        flag.set_progress(Some(42));
        assert_eq!(flag.progress(), Some(42));
        flag.set_progress(None);
        assert_eq!(flag.progress(), None);
    }
}
