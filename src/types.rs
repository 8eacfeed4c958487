//! Core data model types for extraction.
//!
//! Extraction produces [`Record`]s: ordered mappings from column name to a
//! scalar [`serde_json::Value`], keyed either by header name or by synthetic
//! `column_<n>` position.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::observability::ExtractObserver;

/// One extracted row: an ordered mapping from column name to scalar value.
///
/// Key order follows source-column order (`serde_json`'s `preserve_order`
/// feature keeps insertion order). Values keep whatever typing the source
/// reader natively produces: delimited-text yields strings, JSON keeps its
/// native types, spreadsheet cells keep the decoder's typing.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Logical file format, resolved from the file extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Delimited text (`.csv`, `.txt`).
    Delimited,
    /// JSON file whose top level is an array of objects (`.json`).
    JsonArray,
    /// Modern spreadsheet workbook (`.xlsx`).
    Xlsx,
    /// Legacy spreadsheet workbook (`.xls`).
    Xls,
    /// ZIP archive wrapping one of the other formats (`.zip`).
    Archive,
}

impl Format {
    /// Parse a format from a file extension (case-insensitive).
    ///
    /// No other signal (magic bytes, MIME) is consulted.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Delimited),
            "json" => Some(Self::JsonArray),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "zip" => Some(Self::Archive),
            _ => None,
        }
    }

    /// Parse a format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether this format is an archive wrapping another file.
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive)
    }
}

/// How row cells are keyed in the output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Treat the first row as the header list and key cells by header name.
    #[default]
    UseHeaders,
    /// Key every row's cells by 1-based position: `column_1`, `column_2`, ...
    Positional,
}

/// Which archive entry to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveTarget {
    /// Entry at this index in archive order.
    Index(usize),
    /// First entry whose name contains this substring.
    Name(String),
}

/// Options controlling one extraction call.
///
/// Every field is optional; use [`Default`] for common cases.
#[derive(Clone, Default)]
pub struct ExtractOptions {
    /// Maximum number of rows to extract.
    pub limit: Option<usize>,
    /// Header-keyed (default) or positional record keys.
    pub header_mode: HeaderMode,
    /// Explicit delimiter override (delimited-text only); auto-detected when
    /// unset, falling back to comma.
    pub delimiter: Option<u8>,
    /// Which archive entry to extract (archive format only); defaults to the
    /// first non-directory entry.
    pub archive_target: Option<ArchiveTarget>,
    /// Column allow-list: only these columns survive, when present in a row.
    pub columns: Option<Vec<String>>,
    /// Column rename map, applied after the allow-list.
    pub rename: Option<HashMap<String, String>>,
    /// Optional observer for success/failure/skipped-row events. Skipped-row
    /// warnings go to stderr when unset.
    pub observer: Option<Arc<dyn ExtractObserver>>,
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("limit", &self.limit)
            .field("header_mode", &self.header_mode)
            .field("delimiter", &self.delimiter)
            .field("archive_target", &self.archive_target)
            .field("columns", &self.columns)
            .field("rename", &self.rename)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl ExtractOptions {
    pub(crate) fn resolved_observer(&self) -> Arc<dyn ExtractObserver> {
        self.observer
            .clone()
            .unwrap_or_else(|| Arc::new(crate::observability::StdErrObserver))
    }
}

/// Batch extraction result with metadata.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExtractionDetails {
    /// Extracted records, in source order.
    pub records: Vec<Record>,
    /// Resolved format.
    pub format: Format,
    /// Number of extracted records; always equals `records.len()`.
    pub row_count: usize,
    /// The delimiter used for parsing (delimited-text only).
    pub delimiter: Option<u8>,
}
