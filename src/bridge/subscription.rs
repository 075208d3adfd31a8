//! Cancellable observation handles
//!
//! `observe_start` hands one back. The detector checks it before invoking
//! the callback; once cancelled, the callback never runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to a running element observation.
///
/// Clones share state, so the detector keeps one copy and the service
/// cancels through another.
#[derive(Debug, Clone)]
pub struct Subscription {
    cancelled: Arc<AtomicBool>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Stop the observation.
    ///
    /// Returns `true` only for the call that actually cancelled it; later
    /// calls, through this handle or any clone, return `false`.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}
