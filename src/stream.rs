//! Lazy, single-pass record streams with composable transform stages.
//!
//! A [`RecordStream`] pairs a forward-only record source with an ordered list
//! of pending stages. Stages are pure `Record -> Option<Record>` functions: a
//! stage may rewrite a record or drop it by returning `None`. Consuming the
//! stream (it implements [`Iterator`]) applies the stages in composition
//! order. Streams are not restartable; re-reading requires a fresh
//! extraction call.

use crate::types::{Format, Record};

/// A pending transform stage composed onto a stream before consumption.
pub type Stage = Box<dyn FnMut(Record) -> Option<Record> + Send>;

/// A lazy sequence of [`Record`]s plus pending transform stages.
pub struct RecordStream {
    source: Box<dyn Iterator<Item = Record> + Send>,
    stages: Vec<Stage>,
    format: Format,
    delimiter: Option<u8>,
}

impl RecordStream {
    /// Create a stream over a lazy record source.
    pub fn new(source: Box<dyn Iterator<Item = Record> + Send>, format: Format) -> Self {
        Self {
            source,
            stages: Vec::new(),
            format,
            delimiter: None,
        }
    }

    /// Create a stream over an already-materialized batch of records.
    ///
    /// Used by readers whose underlying decoder is not incremental: the rows
    /// are decoded eagerly but still exposed one at a time.
    pub fn from_records(records: Vec<Record>, format: Format) -> Self {
        Self::new(Box::new(records.into_iter()), format)
    }

    /// Set the delimiter reported by this stream (delimited-text only).
    pub fn with_delimiter(mut self, delimiter: Option<u8>) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Append a transform stage, applied after all previously composed stages.
    pub fn compose(&mut self, stage: impl FnMut(Record) -> Option<Record> + Send + 'static) {
        self.stages.push(Box::new(stage));
    }

    /// Resolved format of the source file.
    pub fn format(&self) -> Format {
        self.format
    }

    /// The delimiter used for parsing (delimited-text only).
    pub fn delimiter(&self) -> Option<u8> {
        self.delimiter
    }

    /// Number of pending transform stages.
    pub fn pending_stages(&self) -> usize {
        self.stages.len()
    }
}

impl Iterator for RecordStream {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        'source: loop {
            let mut record = self.source.next()?;
            for stage in &mut self.stages {
                match stage(record) {
                    Some(next) => record = next,
                    // Stage dropped the record; pull the next one.
                    None => continue 'source,
                }
            }
            return Some(record);
        }
    }
}

impl std::fmt::Debug for RecordStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream")
            .field("format", &self.format)
            .field("delimiter", &self.delimiter)
            .field("pending_stages", &self.stages.len())
            .finish()
    }
}
