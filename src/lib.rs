//! `tabular-extract` is a small library for pulling row records out of common
//! file formats, choosing the reader from the file extension alone.
//!
//! The primary entrypoints are [`extract`], [`extract_with_details`], and
//! [`extract_as_stream`] (or the same methods on a held [`Extractor`], which
//! additionally reuses cached delimiter detection across calls).
//!
//! ## What you can extract
//!
//! **File formats (resolved by extension, nothing else):**
//!
//! - **Delimited text**: `.csv`, `.txt` (delimiter taken from the options,
//!   else auto-detected, else comma)
//! - **JSON**: `.json` (the top level must be an array of objects)
//! - **Spreadsheets**: `.xlsx` (modern), `.xls` (legacy); first worksheet only
//! - **Archives**: `.zip`; one entry is extracted and fed back through the
//!   pipeline
//!
//! Every row becomes a [`types::Record`]: an ordered map from column name to
//! scalar value. Values keep the source's native typing: CSV fields stay
//! strings, JSON numbers stay numbers, spreadsheet cells keep the decoder's
//! types. With [`types::HeaderMode::Positional`], cells are keyed
//! `column_1`, `column_2`, ... instead of by header.
//!
//! ## Quick examples
//!
//! ```no_run
//! use tabular_extract::{extract, ExtractOptions};
//!
//! # fn main() -> Result<(), tabular_extract::ExtractError> {
//! // Uses `.csv` to select the delimited-text reader.
//! let records = extract("people.csv", &ExtractOptions::default())?;
//! println!("rows={}", records.len());
//! # Ok(())
//! # }
//! ```
//!
//! Row limits, column selection, and renaming:
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use tabular_extract::{extract, ExtractOptions};
//!
//! # fn main() -> Result<(), tabular_extract::ExtractError> {
//! let options = ExtractOptions {
//!     limit: Some(100),
//!     columns: Some(vec!["name".into(), "age".into()]),
//!     rename: Some(HashMap::from([("name".to_string(), "full_name".to_string())])),
//!     ..Default::default()
//! };
//! let records = extract("people.csv", &options)?;
//! # Ok(())
//! # }
//! ```
//!
//! Streaming keeps a single pass over the file and applies the same
//! projection as a pending transform stage:
//!
//! ```no_run
//! use tabular_extract::{extract_as_stream, ExtractOptions};
//!
//! # fn main() -> Result<(), tabular_extract::ExtractError> {
//! let stream = extract_as_stream("people.csv", &ExtractOptions::default())?;
//! for record in stream.take(10) {
//!     println!("{record:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`extractor`]: the unified entrypoint and column projection
//! - [`extraction`]: format-specific readers
//! - [`stream`]: lazy record streams with composable stages
//! - [`types`]: options, formats, and the record shape
//! - [`observability`]: observer hooks for outcomes and skipped rows
//! - [`detection`]: delimiter sniffing for delimited text
//! - [`error`]: the error type shared across readers

pub mod detection;
pub mod error;
pub mod extraction;
pub mod extractor;
pub mod observability;
pub mod stream;
pub mod types;

pub use error::{ExtractError, ExtractResult};
pub use extractor::{
    extract, extract_as_stream, extract_with_details, project_record, resolve_format, Extractor,
};
pub use stream::RecordStream;
pub use types::{
    ArchiveTarget, ExtractOptions, ExtractionDetails, Format, HeaderMode, Record,
};
