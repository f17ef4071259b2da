//! Error types for sources, playback, and settings.

use thiserror::Error;

/// Failure reading records from a [`MessageSource`](crate::source::MessageSource).
///
/// Exhaustion is never an error: cursors report it as `None`.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("record on line {line} has log time {log_time}, earlier than the previous record")]
    OutOfOrder { line: usize, log_time: u64 },
}

/// Error surfaced by a playback tick or a seek.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("message source failed: {0}")]
    Source(#[from] SourceError),
}

/// Failure loading [`PacerSettings`](crate::settings::PacerSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}
