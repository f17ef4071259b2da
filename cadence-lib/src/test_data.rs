//! Corpus builders and a recording sink used by tests and development helpers.

use std::sync::Mutex;

use crate::protocol::PlaybackState;
use crate::sink::Sink;
use crate::source::{ChannelId, LogTime, MemorySource, Record};

/// Channel used by [`corpus`].
pub const TEST_CHANNEL: ChannelId = 1;

/// Everything a [`CollectingSink`] observed, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Message {
        channel_id: ChannelId,
        log_time: LogTime,
        payload: Vec<u8>,
    },
    Time(LogTime),
    State(PlaybackState),
}

/// In-memory corpus with one record per entry of `times` on [`TEST_CHANNEL`].
///
/// Each payload is `{"index":<i>}` where `i` is the record's position in
/// `times`.
pub fn corpus(times: &[LogTime]) -> MemorySource {
    let records = times
        .iter()
        .enumerate()
        .map(|(index, &log_time)| {
            Record::new(TEST_CHANNEL, log_time, format!("{{\"index\":{}}}", index))
        })
        .collect();
    MemorySource::new(records)
}

/// Sink that records every call for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.lock().clone()
    }

    /// Log times of delivered messages.
    pub fn delivered_times(&self) -> Vec<LogTime> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Message { log_time, .. } => Some(*log_time),
                _ => None,
            })
            .collect()
    }

    pub fn time_broadcasts(&self) -> Vec<LogTime> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Time(log_time) => Some(*log_time),
                _ => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<PlaybackState> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::State(state) => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SinkEvent>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Sink for CollectingSink {
    fn deliver(&self, channel_id: ChannelId, payload: &[u8], log_time: LogTime) {
        self.lock().push(SinkEvent::Message {
            channel_id,
            log_time,
            payload: payload.to_vec(),
        });
    }

    fn broadcast_time(&self, log_time: LogTime) {
        self.lock().push(SinkEvent::Time(log_time));
    }

    fn broadcast_playback_state(&self, state: &PlaybackState) {
        self.lock().push(SinkEvent::State(state.clone()));
    }
}
