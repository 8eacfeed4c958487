//! Per-format readers.
//!
//! Each reader exposes the same two contracts: an eager batch read returning
//! `Vec<Record>` and an incremental stream read returning a
//! [`crate::stream::RecordStream`]. Most callers should go through
//! [`crate::extractor::Extractor`], which resolves the format, picks the
//! reader, and applies the column projection; the readers are public for
//! advanced use.
//!
//! Format-specific modules:
//! - [`delimited`]: CSV/TXT
//! - [`json_array`]: JSON array-of-objects
//! - [`spreadsheet`]: XLSX (modern) and XLS (legacy) workbooks
//! - [`archive`]: ZIP archives, recursing into the wrapped file

pub mod archive;
pub mod delimited;
pub mod json_array;
pub mod spreadsheet;

use crate::types::Record;

/// Build a record with synthetic positional keys `column_1`, `column_2`, ...
/// in value order.
pub(crate) fn positional_record<I>(values: I) -> Record
where
    I: IntoIterator<Item = serde_json::Value>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| (format!("column_{}", idx + 1), value))
        .collect()
}
