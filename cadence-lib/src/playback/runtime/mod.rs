//! Pacing runtime that drives a shared [`PlaybackSource`](super::PlaybackSource).
//!
//! - [`pacer`] holds the blocking tick/sleep loop.
//! - [`thread`] runs that loop on a dedicated thread behind a handle.

mod guard;
mod pacer;
mod thread;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use pacer::run_pacer;
pub use thread::Pacer;

/// Lock the shared player, recovering the state if another actor panicked
/// while holding it.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
