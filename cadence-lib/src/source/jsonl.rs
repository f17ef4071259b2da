//! JSON-lines corpus file with an ordered time index.
//!
//! Each non-blank line holds one record:
//!
//! ```text
//! {"channel": 1, "log_time": 1000000000, "data": {"x": 1.5}}
//! ```
//!
//! The record payload is the compact JSON encoding of `data`.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::SourceError;

use super::{ChannelId, LogTime, MessageSource, Record, TimeRange};

#[derive(Debug, Deserialize)]
struct JsonRecord {
    channel: ChannelId,
    log_time: LogTime,
    #[serde(default)]
    data: serde_json::Value,
}

impl JsonRecord {
    fn parse(text: &str, line: usize) -> Result<Self, SourceError> {
        serde_json::from_str(text).map_err(|source| SourceError::Malformed { line, source })
    }

    fn into_record(self, line: usize) -> Result<Record, SourceError> {
        let payload = serde_json::to_vec(&self.data)
            .map_err(|source| SourceError::Malformed { line, source })?;
        Ok(Record {
            channel_id: self.channel,
            log_time: self.log_time,
            payload,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    log_time: LogTime,
    offset: u64,
    line: usize,
}

/// A JSON-lines corpus read lazily from disk.
///
/// Opening scans the file once to validate every record and build an index of
/// `(log_time, byte offset)` pairs; seeking binary-searches that index and
/// reopens the file at the matching offset.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
    index: Vec<IndexEntry>,
}

impl JsonLinesSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);
        let mut index: Vec<IndexEntry> = Vec::new();
        let mut offset = 0_u64;
        let mut line_number = 0_usize;
        let mut text = String::new();

        loop {
            text.clear();
            let bytes = reader.read_line(&mut text)?;
            if bytes == 0 {
                break;
            }
            line_number += 1;
            let line_offset = offset;
            offset += bytes as u64;

            if text.trim().is_empty() {
                continue;
            }
            let record = JsonRecord::parse(&text, line_number)?;
            if let Some(previous) = index.last().map(|entry| entry.log_time) {
                if record.log_time < previous {
                    return Err(SourceError::OutOfOrder {
                        line: line_number,
                        log_time: record.log_time,
                    });
                }
            }
            index.push(IndexEntry {
                log_time: record.log_time,
                offset: line_offset,
                line: line_number,
            });
        }

        debug!("indexed {} records from {}", index.len(), path.display());
        Ok(Self { path, index })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl MessageSource for JsonLinesSource {
    type Iter = JsonLinesIter;

    fn time_range(&self) -> TimeRange {
        match (self.index.first(), self.index.last()) {
            (Some(first), Some(last)) => TimeRange::new(first.log_time, last.log_time),
            _ => TimeRange::empty(),
        }
    }

    fn seek(&self, log_time: LogTime) -> Result<JsonLinesIter, SourceError> {
        let position = self.index.partition_point(|entry| entry.log_time < log_time);
        let Some(entry) = self.index.get(position) else {
            return Ok(JsonLinesIter {
                reader: None,
                line: 0,
            });
        };

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(entry.offset))?;
        Ok(JsonLinesIter {
            reader: Some(BufReader::new(file)),
            line: entry.line - 1,
        })
    }
}

/// Lazy record iterator over a [`JsonLinesSource`].
///
/// After yielding an error the iterator is fused and reports exhaustion.
#[derive(Debug)]
pub struct JsonLinesIter {
    reader: Option<BufReader<File>>,
    line: usize,
}

impl JsonLinesIter {
    fn read_record(&mut self) -> Option<Result<Record, SourceError>> {
        let reader = self.reader.as_mut()?;
        let mut text = String::new();
        loop {
            text.clear();
            match reader.read_line(&mut text) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(err.into())),
            }
            self.line += 1;
            if !text.trim().is_empty() {
                break;
            }
        }
        let line = self.line;
        Some(JsonRecord::parse(&text, line).and_then(|record| record.into_record(line)))
    }
}

impl Iterator for JsonLinesIter {
    type Item = Result<Record, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.read_record();
        if matches!(item, None | Some(Err(_))) {
            self.reader = None;
        }
        item
    }
}
