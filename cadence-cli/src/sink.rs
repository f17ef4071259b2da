//! Stdout sink emitting one JSON object per line.

use std::io::Write;

use cadence_lib::protocol::PlaybackState;
use cadence_lib::sink::Sink;
use cadence_lib::source::{ChannelId, LogTime};
use log::debug;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum OutputLine<'a> {
    Message {
        channel: ChannelId,
        log_time: LogTime,
        data: Value,
    },
    Time {
        timestamp: LogTime,
    },
    PlaybackState(&'a PlaybackState),
}

/// Prints delivered messages and broadcasts to stdout.
pub struct StdoutSink {
    time_enabled: bool,
}

impl StdoutSink {
    /// `time_enabled` mirrors the client's time capability; without it time
    /// broadcasts are dropped.
    pub fn new(time_enabled: bool) -> Self {
        Self { time_enabled }
    }

    fn emit(&self, line: &OutputLine) {
        let text = match serde_json::to_string(line) {
            Ok(text) => text,
            Err(err) => {
                debug!("failed to encode output line: {}", err);
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", text).and_then(|_| stdout.flush()) {
            debug!("dropping output line: {}", err);
        }
    }
}

/// Payloads are JSON from the corpus; anything else is passed as a string.
fn payload_value(payload: &[u8]) -> Value {
    serde_json::from_slice(payload)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(payload).into_owned()))
}

impl Sink for StdoutSink {
    fn deliver(&self, channel_id: ChannelId, payload: &[u8], log_time: LogTime) {
        self.emit(&OutputLine::Message {
            channel: channel_id,
            log_time,
            data: payload_value(payload),
        });
    }

    fn broadcast_time(&self, log_time: LogTime) {
        if self.time_enabled {
            self.emit(&OutputLine::Time {
                timestamp: log_time,
            });
        }
    }

    fn broadcast_playback_state(&self, state: &PlaybackState) {
        self.emit(&OutputLine::PlaybackState(state));
    }
}

#[cfg(test)]
mod tests {
    use cadence_lib::playback::{PlaybackPosition, PlaybackStatus};

    use super::*;

    #[test]
    fn encodes_message_lines() {
        let line = OutputLine::Message {
            channel: 3,
            log_time: 42,
            data: payload_value(br#"{"x":1}"#),
        };
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"op":"message","channel":3,"log_time":42,"data":{"x":1}}"#
        );
    }

    #[test]
    fn non_json_payload_becomes_string() {
        assert_eq!(payload_value(b"plain"), Value::String("plain".to_string()));
    }

    #[test]
    fn encodes_playback_state_lines() {
        let state = PlaybackState::broadcast(PlaybackPosition {
            status: PlaybackStatus::Ended,
            current_time: 7,
            speed: 1.0,
        });
        let text = serde_json::to_string(&OutputLine::PlaybackState(&state)).unwrap();
        assert_eq!(
            text,
            r#"{"op":"playbackState","status":"ended","current_time":7,"speed":1.0,"did_seek":false}"#
        );
    }

    #[test]
    fn encodes_time_lines() {
        let text = serde_json::to_string(&OutputLine::Time { timestamp: 9 }).unwrap();
        assert_eq!(text, r#"{"op":"time","timestamp":9}"#);
    }
}
