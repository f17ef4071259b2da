//! Peekable, re-seekable position into a [`MessageSource`].

use crate::error::SourceError;

use super::{LogTime, MessageSource, Record, TimeRange};

/// Walks a [`MessageSource`] in log-time order with one record of lookahead.
///
/// The pacer needs to test a record's due time before committing to deliver
/// it, so the next record is buffered by [`peek`](Self::peek) and only dropped
/// by [`advance`](Self::advance).
pub struct MessageCursor<S: MessageSource> {
    source: S,
    range: TimeRange,
    iter: S::Iter,
    pending: Option<Record>,
}

impl<S: MessageSource> MessageCursor<S> {
    /// Open a cursor positioned at the start of the corpus.
    pub fn new(source: S) -> Result<Self, SourceError> {
        let range = source.time_range();
        let iter = source.seek(range.start)?;
        Ok(Self {
            source,
            range,
            iter,
            pending: None,
        })
    }

    pub fn time_range(&self) -> TimeRange {
        self.range
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reposition at the first record with `log_time >= target`.
    ///
    /// The target is clamped into the corpus range. Seeking never rewinds to a
    /// predecessor record when `target` falls between two records. Returns the
    /// clamped target. On error the previous position is kept.
    pub fn seek(&mut self, target: LogTime) -> Result<LogTime, SourceError> {
        let target = self.range.clamp(target);
        let iter = self.source.seek(target)?;
        self.iter = iter;
        self.pending = None;
        Ok(target)
    }

    /// Next record without consuming it; `Ok(None)` once exhausted.
    pub fn peek(&mut self) -> Result<Option<&Record>, SourceError> {
        if self.pending.is_none() {
            match self.iter.next() {
                Some(Ok(record)) => self.pending = Some(record),
                Some(Err(err)) => return Err(err),
                None => return Ok(None),
            }
        }
        Ok(self.pending.as_ref())
    }

    /// Consume the record returned by the last [`peek`](Self::peek).
    pub fn advance(&mut self) -> Option<Record> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn cursor() -> MessageCursor<MemorySource> {
        MessageCursor::new(MemorySource::new(vec![
            Record::new(1, 100, "a"),
            Record::new(1, 200, "b"),
            Record::new(1, 300, "c"),
        ]))
        .unwrap()
    }

    fn peek_time(cursor: &mut MessageCursor<MemorySource>) -> Option<LogTime> {
        cursor.peek().unwrap().map(|record| record.log_time)
    }

    #[test]
    fn peek_does_not_consume() {
        let mut cursor = cursor();
        assert_eq!(peek_time(&mut cursor), Some(100));
        assert_eq!(peek_time(&mut cursor), Some(100));
        assert_eq!(cursor.advance().map(|r| r.log_time), Some(100));
        assert_eq!(peek_time(&mut cursor), Some(200));
    }

    #[test]
    fn advance_without_peek_is_noop() {
        let mut cursor = cursor();
        assert!(cursor.advance().is_none());
        assert_eq!(peek_time(&mut cursor), Some(100));
    }

    #[test]
    fn seek_discards_pending_record() {
        let mut cursor = cursor();
        assert_eq!(peek_time(&mut cursor), Some(100));
        assert_eq!(cursor.seek(250).unwrap(), 250);
        assert_eq!(peek_time(&mut cursor), Some(300));
    }

    #[test]
    fn seek_clamps_into_range() {
        let mut cursor = cursor();
        assert_eq!(cursor.seek(0).unwrap(), 100);
        assert_eq!(peek_time(&mut cursor), Some(100));
        assert_eq!(cursor.seek(10_000).unwrap(), 300);
        assert_eq!(peek_time(&mut cursor), Some(300));
    }

    #[test]
    fn reports_exhaustion() {
        let mut cursor = cursor();
        for _ in 0..3 {
            cursor.peek().unwrap();
            cursor.advance();
        }
        assert_eq!(peek_time(&mut cursor), None);
        assert!(cursor.advance().is_none());
    }
}
