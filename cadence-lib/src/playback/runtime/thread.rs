//! Pacer-thread bootstrap.
//!
//! Spawns [`run_pacer`] on a dedicated thread and keeps the handles needed to
//! observe and stop it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::warn;

use crate::error::PlaybackError;
use crate::playback::PlaybackSource;
use crate::settings::PacerSettings;
use crate::sink::Sink;

use super::guard::PacerThreadGuard;
use super::lock;
use super::pacer::run_pacer;

/// Handle to a running pacer thread.
///
/// Dropping the handle stops the thread and waits for it to exit.
pub struct Pacer {
    done: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    last_error: Arc<Mutex<Option<PlaybackError>>>,
    handle: Option<JoinHandle<()>>,
}

impl Pacer {
    /// Start pacing `player` into `sink` on a new thread.
    pub fn spawn<P, K>(player: Arc<Mutex<P>>, sink: K, settings: PacerSettings) -> Self
    where
        P: PlaybackSource + 'static,
        K: Sink + 'static,
    {
        let done = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));
        let last_error = Arc::new(Mutex::new(None));

        let thread_done = done.clone();
        let thread_running = running.clone();
        let thread_error = last_error.clone();
        let handle = thread::spawn(move || {
            let _guard = PacerThreadGuard::new(thread_running);
            run_pacer(&*player, &sink, &settings, &thread_done, |err| {
                *lock(&thread_error) = Some(err);
            });
        });

        Self {
            done,
            running,
            last_error,
            handle: Some(handle),
        }
    }

    /// Whether the pacer thread is still alive.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Take the most recent source error, if any occurred since the last call.
    pub fn take_error(&self) -> Option<PlaybackError> {
        lock(&self.last_error).take()
    }

    /// Signal the thread to exit and wait for it.
    pub fn stop(&mut self) {
        self.done.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("pacer thread panicked");
            }
        }
    }
}

impl Drop for Pacer {
    fn drop(&mut self) {
        self.stop();
    }
}
