//! Delimited-text (CSV/TXT) extraction.
//!
//! The delimiter is resolved by the orchestrator (explicit option, cached
//! detection, comma fallback) and passed in. Rows that fail to parse are
//! skipped with a warning to the observer; extraction continues. Rows with
//! inconsistent field counts are accepted: missing fields read as empty
//! strings, extra fields are dropped in header mode. The `csv` crate strips
//! a leading UTF-8 BOM on its own.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ExtractError, ExtractResult};
use crate::observability::{ExtractContext, ExtractObserver};
use crate::stream::RecordStream;
use crate::types::{ExtractOptions, Format, HeaderMode, Record};

/// Read all records eagerly, in source order, honoring the row limit.
pub fn batch_read(
    path: impl AsRef<Path>,
    delimiter: u8,
    options: &ExtractOptions,
) -> ExtractResult<Vec<Record>> {
    Ok(stream_read(path, delimiter, options)?.collect())
}

/// Read records lazily from disk, one row at a time.
pub fn stream_read(
    path: impl AsRef<Path>,
    delimiter: u8,
    options: &ExtractOptions,
) -> ExtractResult<RecordStream> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(options.header_mode == HeaderMode::UseHeaders)
        .flexible(true)
        .from_path(path)?;

    let headers: Option<Vec<String>> = match options.header_mode {
        HeaderMode::UseHeaders => Some(
            reader
                .headers()?
                .iter()
                .map(strip_embedded_quotes)
                .collect(),
        ),
        HeaderMode::Positional => None,
    };

    let rows = DelimitedRows {
        records: reader.into_records(),
        headers,
        remaining: options.limit,
        row: 0,
        ctx: ExtractContext {
            path: path.to_path_buf(),
            format: Format::Delimited,
        },
        observer: options.resolved_observer(),
    };

    Ok(RecordStream::new(Box::new(rows), Format::Delimited).with_delimiter(Some(delimiter)))
}

struct DelimitedRows {
    records: csv::StringRecordsIntoIter<File>,
    headers: Option<Vec<String>>,
    remaining: Option<usize>,
    row: usize,
    ctx: ExtractContext,
    observer: Arc<dyn ExtractObserver>,
}

impl Iterator for DelimitedRows {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            if self.remaining == Some(0) {
                return None;
            }
            let result = self.records.next()?;
            self.row += 1;
            match result {
                Ok(record) => {
                    if let Some(remaining) = self.remaining.as_mut() {
                        *remaining -= 1;
                    }
                    return Some(match &self.headers {
                        Some(headers) => keyed_record(headers, &record),
                        None => positional_from_fields(&record),
                    });
                }
                Err(err) => {
                    // Header row is row 1 in header mode.
                    let user_row = self.row + usize::from(self.headers.is_some());
                    self.observer.on_row_skipped(
                        &self.ctx,
                        &ExtractError::RowParse {
                            row: user_row,
                            message: err.to_string(),
                        },
                    );
                }
            }
        }
    }
}

fn keyed_record(headers: &[String], record: &csv::StringRecord) -> Record {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let field = record.get(idx).unwrap_or("");
            (
                header.clone(),
                serde_json::Value::String(strip_embedded_quotes(field)),
            )
        })
        .collect()
}

fn positional_from_fields(record: &csv::StringRecord) -> Record {
    super::positional_record(
        record
            .iter()
            .map(|field| serde_json::Value::String(strip_embedded_quotes(field))),
    )
}

// Stray quote characters the csv parser leaves behind (the parser itself
// unquotes well-formed quoted fields).
fn strip_embedded_quotes(field: &str) -> String {
    field.replace('"', "")
}
