//! Playback state machine over a [`MessageSource`].

use std::time::Instant;

use log::{debug, error, info};

use crate::clock::{clamp_speed, VirtualClock};
use crate::error::{PlaybackError, SourceError};
use crate::protocol::PlaybackState;
use crate::settings::PacerSettings;
use crate::sink::Sink;
use crate::source::{LogTime, MessageCursor, MessageSource, TimeRange};

use super::{NotifyThrottle, PlaybackSource, PlaybackStatus, Tick};

/// Primary playback controller.
///
/// `Player` owns the cursor, the virtual clock, and the visible position. It is
/// meant to sit behind a single `Mutex` shared by the pacer and the control
/// handler, so every transition sees a consistent clock, cursor, and status.
pub struct Player<S: MessageSource> {
    cursor: MessageCursor<S>,
    clock: VirtualClock,
    throttle: NotifyThrottle,
    status: PlaybackStatus,
    current_time: LogTime,
    speed: f32,
}

impl<S: MessageSource> Player<S> {
    /// Create a paused player positioned at the start of `source`.
    pub fn new(source: S) -> Result<Self, PlaybackError> {
        Self::with_settings(source, &PacerSettings::default())
    }

    pub fn with_settings(source: S, settings: &PacerSettings) -> Result<Self, PlaybackError> {
        let cursor = MessageCursor::new(source)?;
        let range = cursor.time_range();
        let speed = clamp_speed(settings.initial_speed);
        debug!("player created over [{}, {}]", range.start, range.end);
        Ok(Self {
            cursor,
            clock: VirtualClock::paused(range.start, speed),
            throttle: NotifyThrottle::new(settings.notify_interval()),
            status: PlaybackStatus::Paused,
            current_time: range.start,
            speed,
        })
    }

    pub fn source(&self) -> &S {
        self.cursor.source()
    }

    pub fn play_at(&mut self, now: Instant) {
        match self.status {
            PlaybackStatus::Ended => debug!("ignoring play: playback ended, seek first"),
            PlaybackStatus::Playing => {}
            PlaybackStatus::Paused => {
                self.clock.resume_at(now);
                self.status = PlaybackStatus::Playing;
                info!("playing from {}", self.current_time);
            }
        }
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.status == PlaybackStatus::Playing {
            self.clock.pause_at(now);
            self.status = PlaybackStatus::Paused;
            info!("paused at {}", self.current_time);
        }
    }

    pub fn set_speed_at(&mut self, speed: f32, now: Instant) {
        let speed = clamp_speed(speed);
        self.clock.set_speed_at(speed, now);
        self.speed = speed;
    }

    /// Seek to `log_time`, clamped into the corpus range.
    ///
    /// The clock restarts at the target with the current speed. Ended playback
    /// is revived as paused; otherwise the status is kept. On error nothing
    /// changes.
    pub fn seek_at(&mut self, log_time: LogTime, now: Instant) -> Result<(), PlaybackError> {
        let target = self.cursor.seek(log_time)?;
        let mut clock = VirtualClock::new_at(target, self.speed, now);
        if self.status != PlaybackStatus::Playing {
            clock.pause_at(now);
        }
        self.clock = clock;
        self.throttle.reset();
        self.current_time = target;
        if self.status == PlaybackStatus::Ended {
            self.status = PlaybackStatus::Paused;
        }
        info!("seeked to {}", target);
        Ok(())
    }

    /// One pacer tick evaluated at `now`.
    pub fn deliver_next_at(
        &mut self,
        sink: &dyn Sink,
        now: Instant,
    ) -> Result<Tick, PlaybackError> {
        if self.status != PlaybackStatus::Playing {
            return Ok(Tick::Idle);
        }

        let next_time = self
            .cursor
            .peek()
            .map(|record| record.map(|record| record.log_time));
        let log_time = match next_time {
            Ok(Some(log_time)) => log_time,
            Ok(None) => {
                self.end(sink);
                return Ok(Tick::Ended);
            }
            Err(err) => return Err(self.fail(sink, err)),
        };

        let wakeup = self.clock.wakeup_for_at(log_time, now);
        if wakeup > now {
            return Ok(Tick::Wait(wakeup - now));
        }

        if let Some(record) = self.cursor.advance() {
            self.current_time = record.log_time;
            if let Some(timestamp) = self.throttle.notify(record.log_time) {
                sink.broadcast_time(timestamp);
            }
            sink.deliver(record.channel_id, &record.payload, record.log_time);
        }
        Ok(Tick::Delivered)
    }

    fn end(&mut self, sink: &dyn Sink) {
        self.status = PlaybackStatus::Ended;
        self.current_time = self.cursor.time_range().end;
        info!("playback ended at {}", self.current_time);
        sink.broadcast_playback_state(&PlaybackState::broadcast(self.position()));
    }

    fn fail(&mut self, sink: &dyn Sink, err: SourceError) -> PlaybackError {
        error!("stopping playback at {}: {}", self.current_time, err);
        self.status = PlaybackStatus::Ended;
        sink.broadcast_playback_state(&PlaybackState::broadcast(self.position()));
        err.into()
    }
}

impl<S: MessageSource> PlaybackSource for Player<S> {
    fn time_range(&self) -> TimeRange {
        self.cursor.time_range()
    }

    fn set_speed(&mut self, speed: f32) {
        self.set_speed_at(speed, Instant::now());
    }

    fn play(&mut self) {
        self.play_at(Instant::now());
    }

    fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    fn seek(&mut self, log_time: LogTime) -> Result<(), PlaybackError> {
        self.seek_at(log_time, Instant::now())
    }

    fn status(&self) -> PlaybackStatus {
        self.status
    }

    fn current_time(&self) -> LogTime {
        self.current_time
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn deliver_next(&mut self, sink: &dyn Sink) -> Result<Tick, PlaybackError> {
        self.deliver_next_at(sink, Instant::now())
    }
}
