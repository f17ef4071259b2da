//! Recorded message corpora and the cursor used to walk them in time order.

mod cursor;
mod jsonl;
mod memory;

pub use cursor::MessageCursor;
pub use jsonl::{JsonLinesIter, JsonLinesSource};
pub use memory::{MemoryIter, MemorySource};

use crate::error::SourceError;

/// Nanoseconds since the corpus epoch.
pub type LogTime = u64;

/// Identifier of the channel a record was recorded on.
pub type ChannelId = u16;

/// Inclusive log-time bounds of a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: LogTime,
    pub end: LogTime,
}

impl TimeRange {
    pub fn new(start: LogTime, end: LogTime) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Range of a corpus without records.
    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn clamp(&self, log_time: LogTime) -> LogTime {
        log_time.clamp(self.start, self.end)
    }

    pub fn contains(&self, log_time: LogTime) -> bool {
        (self.start..=self.end).contains(&log_time)
    }
}

/// A single recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub channel_id: ChannelId,
    pub log_time: LogTime,
    pub payload: Vec<u8>,
}

impl Record {
    pub fn new(channel_id: ChannelId, log_time: LogTime, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            channel_id,
            log_time,
            payload: payload.into(),
        }
    }
}

/// A time-ordered corpus of records that can resume iteration at any log time.
///
/// Implementations must yield records in non-decreasing `log_time` order.
/// Read failures are yielded as `Some(Err(_))`; exhaustion is `None`.
pub trait MessageSource: Send {
    type Iter: Iterator<Item = Result<Record, SourceError>> + Send;

    fn time_range(&self) -> TimeRange;

    /// Start iterating at the first record with `log_time >= log_time`.
    fn seek(&self, log_time: LogTime) -> Result<Self::Iter, SourceError>;
}
