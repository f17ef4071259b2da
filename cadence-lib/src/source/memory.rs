//! In-memory corpus backed by a sorted record vector.

use std::sync::Arc;

use crate::error::SourceError;

use super::{LogTime, MessageSource, Record, TimeRange};

/// Records held in memory, sorted by log time.
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: Arc<[Record]>,
}

impl MemorySource {
    /// Build a source from records in any order.
    ///
    /// Records are stably sorted, so records sharing a timestamp keep their
    /// input order.
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|record| record.log_time);
        Self {
            records: records.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl MessageSource for MemorySource {
    type Iter = MemoryIter;

    fn time_range(&self) -> TimeRange {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => TimeRange::new(first.log_time, last.log_time),
            _ => TimeRange::empty(),
        }
    }

    fn seek(&self, log_time: LogTime) -> Result<MemoryIter, SourceError> {
        let index = self
            .records
            .partition_point(|record| record.log_time < log_time);
        Ok(MemoryIter {
            records: self.records.clone(),
            index,
        })
    }
}

/// Iterator over a [`MemorySource`] from a seek position.
#[derive(Debug)]
pub struct MemoryIter {
    records: Arc<[Record]>,
    index: usize,
}

impl Iterator for MemoryIter {
    type Item = Result<Record, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.get(self.index)?.clone();
        self.index += 1;
        Some(Ok(record))
    }
}
