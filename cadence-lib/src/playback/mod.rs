//! Playback state machine, control handling, and the pacing runtime.

mod control;
mod player;
mod runtime;
mod throttle;

use std::time::Duration;

use serde::Serialize;

use crate::error::PlaybackError;
use crate::sink::Sink;
use crate::source::{LogTime, TimeRange};

pub use control::{ControlHandler, ControlListener};
pub use player::Player;
pub use runtime::{run_pacer, Pacer};
pub use throttle::NotifyThrottle;

/// High-level playback status reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Playing,
    Paused,
    /// Every record has been delivered. Only a seek leaves this state.
    Ended,
}

/// Externally visible projection of the playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackPosition {
    pub status: PlaybackStatus,
    pub current_time: LogTime,
    pub speed: f32,
}

/// Outcome of one pacer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not playing; idle briefly and try again.
    Idle,
    /// A record was delivered; call again immediately.
    Delivered,
    /// The corpus was exhausted and playback transitioned to `Ended`.
    Ended,
    /// The next record is due after this delay.
    Wait(Duration),
}

/// A data source that supports ranged playback with play/pause, seek, and
/// variable speed.
///
/// Implementations track status and position and pace delivery against log
/// timestamps. [`Player`] implements this over any
/// [`MessageSource`](crate::source::MessageSource).
pub trait PlaybackSource: Send {
    /// Inclusive log-time bounds of the data.
    fn time_range(&self) -> TimeRange;

    /// Set the speed multiplier; invalid values are clamped.
    fn set_speed(&mut self, speed: f32);

    /// Begin or resume playback. Has no effect once playback has ended.
    fn play(&mut self);

    fn pause(&mut self);

    /// Reposition at `log_time`, clamped into [`time_range`](Self::time_range).
    fn seek(&mut self, log_time: LogTime) -> Result<(), PlaybackError>;

    fn status(&self) -> PlaybackStatus;

    fn current_time(&self) -> LogTime;

    fn speed(&self) -> f32;

    /// Deliver the next record if it is due, or report how long to wait.
    fn deliver_next(&mut self, sink: &dyn Sink) -> Result<Tick, PlaybackError>;

    fn position(&self) -> PlaybackPosition {
        PlaybackPosition {
            status: self.status(),
            current_time: self.current_time(),
            speed: self.speed(),
        }
    }
}
