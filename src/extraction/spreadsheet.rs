//! Spreadsheet extraction for modern (`.xlsx`) and legacy (`.xls`) workbooks.
//!
//! Only the first worksheet is read, regardless of sheet count; this bounds
//! memory and time on large workbooks. The first non-empty row is the header
//! row in header mode; fully-empty rows are skipped. Cell values keep the
//! decoder's native typing.
//!
//! The modern reader stops converting rows as soon as the row limit is
//! reached. The legacy decoder is not incremental, so the legacy reader
//! converts the whole sheet and truncates afterwards.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{ExtractError, ExtractResult};
use crate::stream::RecordStream;
use crate::types::{ExtractOptions, Format, HeaderMode, Record};

/// Batch-read the first sheet of a modern workbook, stopping early at the
/// row limit.
pub fn batch_read_modern(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> ExtractResult<Vec<Record>> {
    let range = first_sheet_range(path.as_ref())?;
    Ok(records_from_range(&range, options, true))
}

/// Batch-read the first sheet of a legacy workbook; the whole sheet is
/// decoded, then truncated to the row limit.
pub fn batch_read_legacy(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> ExtractResult<Vec<Record>> {
    let range = first_sheet_range(path.as_ref())?;
    let mut records = records_from_range(&range, options, false);
    if let Some(limit) = options.limit {
        records.truncate(limit);
    }
    Ok(records)
}

/// Stream records from a modern workbook.
///
/// The sheet is decoded up front (the decoder has no row-by-row mode), but
/// conversion stops at the row limit and the rows are exposed lazily.
pub fn stream_read_modern(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> ExtractResult<RecordStream> {
    Ok(RecordStream::from_records(
        batch_read_modern(path, options)?,
        Format::Xlsx,
    ))
}

/// Stream records from a legacy workbook (decoded eagerly, exposed lazily).
pub fn stream_read_legacy(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> ExtractResult<RecordStream> {
    Ok(RecordStream::from_records(
        batch_read_legacy(path, options)?,
        Format::Xls,
    ))
}

fn first_sheet_range(path: &Path) -> ExtractResult<Range<Data>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ExtractError::InvalidStructure {
            message: "workbook has no sheets".to_string(),
        })?;
    Ok(workbook.worksheet_range(&sheet)?)
}

fn records_from_range(range: &Range<Data>, options: &ExtractOptions, stop_at_limit: bool) -> Vec<Record> {
    let mut headers: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for row in range.rows() {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        if options.header_mode == HeaderMode::UseHeaders && headers.is_none() {
            headers = Some(row.iter().map(cell_to_header_string).collect());
            continue;
        }

        records.push(match &headers {
            Some(headers) => keyed_record(headers, row),
            None => super::positional_record(row.iter().map(cell_to_value)),
        });

        if stop_at_limit && options.limit == Some(records.len()) {
            break;
        }
    }

    records
}

fn keyed_record(headers: &[String], row: &[Data]) -> Record {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let cell = row.get(idx).unwrap_or(&Data::Empty);
            (header.clone(), cell_to_value(cell))
        })
        .collect()
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

fn cell_to_value(c: &Data) -> serde_json::Value {
    match c {
        Data::Empty => serde_json::Value::Null,
        Data::String(s) => serde_json::Value::String(s.clone()),
        Data::Int(i) => serde_json::Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Data::Bool(b) => serde_json::Value::Bool(*b),
        Data::DateTime(dt) => serde_json::Number::from_f64(dt.as_f64())
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => serde_json::Value::String(s.clone()),
        Data::Error(e) => serde_json::Value::String(format!("{e:?}")),
    }
}
