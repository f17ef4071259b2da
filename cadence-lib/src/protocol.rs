//! Control messages exchanged with a playback client.

use serde::{Deserialize, Serialize};

use crate::playback::{PlaybackPosition, PlaybackStatus};
use crate::source::LogTime;

/// A playback command from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackCommand {
    Play,
    Pause,
    /// Any command this server does not understand; ignored.
    #[serde(other)]
    Unrecognized,
}

/// A request to control playback from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackControlRequest {
    /// Echoed verbatim in the reply.
    pub request_id: String,
    pub command: PlaybackCommand,
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Seek target in nanoseconds, only set when the client seeked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seek_time: Option<LogTime>,
}

fn default_speed() -> f32 {
    1.0
}

impl PlaybackControlRequest {
    pub fn new(request_id: impl Into<String>, command: PlaybackCommand, speed: f32) -> Self {
        Self {
            request_id: request_id.into(),
            command,
            speed,
            seek_time: None,
        }
    }

    pub fn with_seek(mut self, seek_time: LogTime) -> Self {
        self.seek_time = Some(seek_time);
        self
    }
}

/// Playback state reported to clients.
///
/// Replies are built with [`PlaybackState::reply`], which copies the
/// request's id; spontaneous broadcasts carry no id. The id cannot be set any
/// other way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    status: PlaybackStatus,
    current_time: LogTime,
    speed: f32,
    did_seek: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

impl PlaybackState {
    /// Reply to `request`, tagged with its id.
    pub fn reply(
        request: &PlaybackControlRequest,
        position: PlaybackPosition,
        did_seek: bool,
    ) -> Self {
        Self {
            status: position.status,
            current_time: position.current_time,
            speed: position.speed,
            did_seek,
            request_id: Some(request.request_id.clone()),
        }
    }

    /// Unsolicited state update, such as playback reaching the end.
    pub fn broadcast(position: PlaybackPosition) -> Self {
        Self {
            status: position.status,
            current_time: position.current_time,
            speed: position.speed,
            did_seek: false,
            request_id: None,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current_time(&self) -> LogTime {
        self.current_time
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn did_seek(&self) -> bool {
        self.did_seek
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}
