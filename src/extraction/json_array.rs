//! JSON-array extraction.
//!
//! The whole file must parse as a single JSON value whose top level is an
//! array of objects; any other top-level shape is an error. Known
//! limitation: this format is not streamed from disk; the file is parsed
//! eagerly even for stream reads, and the in-memory array is then exposed
//! incrementally.

use std::fs;
use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::observability::ExtractContext;
use crate::stream::RecordStream;
use crate::types::{ExtractOptions, Format, HeaderMode, Record};

/// Read all records eagerly, in source order, honoring the row limit.
pub fn batch_read(path: impl AsRef<Path>, options: &ExtractOptions) -> ExtractResult<Vec<Record>> {
    Ok(stream_read(path, options)?.collect())
}

/// Parse the file eagerly, then expose its elements one at a time.
pub fn stream_read(path: impl AsRef<Path>, options: &ExtractOptions) -> ExtractResult<RecordStream> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&text)?;

    let items = match parsed {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(ExtractError::InvalidStructure {
                message: format!(
                    "json top level must be an array, got {}",
                    json_type_name(&other)
                ),
            });
        }
    };

    // The row limit slices the raw array; a skipped element within the
    // prefix is not replaced by a later one.
    let limited: Box<dyn Iterator<Item = serde_json::Value> + Send> = match options.limit {
        Some(limit) => Box::new(items.into_iter().take(limit)),
        None => Box::new(items.into_iter()),
    };

    let header_mode = options.header_mode;
    let ctx = ExtractContext {
        path: path.to_path_buf(),
        format: Format::JsonArray,
    };
    let observer = options.resolved_observer();

    let source = limited.enumerate().filter_map(move |(idx, value)| match value {
        serde_json::Value::Object(map) => Some(match header_mode {
            HeaderMode::UseHeaders => map,
            // Positional mode keys the element's values, not its keys.
            HeaderMode::Positional => super::positional_record(map.into_iter().map(|(_, v)| v)),
        }),
        other => {
            observer.on_row_skipped(
                &ctx,
                &ExtractError::RowParse {
                    row: idx + 1,
                    message: format!("expected a json object, got {}", json_type_name(&other)),
                },
            );
            None
        }
    });

    Ok(RecordStream::new(Box::new(source), Format::JsonArray))
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
