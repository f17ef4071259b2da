//! Liveness guard for pacer threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Keeps `running` in sync with the pacer thread's lifetime, including when
/// the thread unwinds from a panic.
pub(super) struct PacerThreadGuard {
    running: Arc<AtomicBool>,
}

impl PacerThreadGuard {
    pub(super) fn new(running: Arc<AtomicBool>) -> Self {
        running.store(true, Ordering::SeqCst);
        Self { running }
    }
}

impl Drop for PacerThreadGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
