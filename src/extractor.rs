//! Unified extraction entrypoint.
//!
//! [`Extractor`] resolves the format from the file extension, dispatches to
//! the matching reader, and applies the column projection. It owns the only
//! piece of cached state: a per-instance delimiter-detection memo keyed by
//! path, discarded with [`Extractor::clear_cache`].
//!
//! The free functions [`extract`], [`extract_with_details`], and
//! [`extract_as_stream`] construct a fresh `Extractor` per call for
//! one-shot use; repeated calls against the same delimited files benefit
//! from holding an `Extractor` instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::detection;
use crate::error::{ExtractError, ExtractResult};
use crate::extraction::{archive, delimited, json_array, spreadsheet};
use crate::observability::{ExtractContext, ExtractStats, Severity};
use crate::stream::RecordStream;
use crate::types::{ExtractOptions, ExtractionDetails, Format, Record};

const DEFAULT_DELIMITER: u8 = b',';

/// Resolve a file's format from its extension.
///
/// Pure function of the extension (case-insensitive); fails with
/// [`ExtractError::UnsupportedFormat`] when the extension is absent or
/// unmapped, before any I/O happens.
pub fn resolve_format(path: impl AsRef<Path>) -> ExtractResult<Format> {
    let path = path.as_ref();
    Format::from_path(path).ok_or_else(|| ExtractError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

/// Apply the column allow-list, then the rename map, to one record.
///
/// Identity when neither is configured. With an allow-list, the output holds
/// only keys present in both the list and the record, in allow-list order.
/// The rename map then replaces each surviving key found in its domain; when
/// two keys end up mapping to the same target name, the later one wins.
pub fn project_record(
    record: Record,
    columns: Option<&[String]>,
    rename: Option<&HashMap<String, String>>,
) -> Record {
    let filtered: Record = match columns {
        Some(cols) => cols
            .iter()
            .filter_map(|col| record.get(col).map(|value| (col.clone(), value.clone())))
            .collect(),
        None => record,
    };
    match rename {
        Some(map) => filtered
            .into_iter()
            .map(|(key, value)| (map.get(&key).cloned().unwrap_or(key), value))
            .collect(),
        None => filtered,
    }
}

/// Format-dispatching extractor with a per-instance delimiter cache.
///
/// Holds no other shared state; concurrent calls against different paths are
/// safe, and concurrent calls against the same path may at worst detect the
/// delimiter redundantly.
pub struct Extractor {
    delimiter_cache: RwLock<HashMap<PathBuf, u8>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Create an extractor with an empty delimiter cache.
    pub fn new() -> Self {
        Self {
            delimiter_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Extract all records from a file, applying the configured row limit
    /// and column projection.
    pub fn extract(
        &self,
        path: impl AsRef<Path>,
        options: &ExtractOptions,
    ) -> ExtractResult<Vec<Record>> {
        let path = path.as_ref();
        let format = resolve_format(path)?;
        let observer = options.resolved_observer();
        let ctx = ExtractContext {
            path: path.to_path_buf(),
            format,
        };

        let result = self.batch_dispatch(path, format, options);
        match &result {
            Ok(records) => observer.on_success(&ctx, ExtractStats {
                rows: records.len(),
            }),
            Err(e) => observer.on_failure(&ctx, severity_for_error(e), e),
        }

        let records = result?;
        if options.columns.is_none() && options.rename.is_none() {
            return Ok(records);
        }
        Ok(records
            .into_iter()
            .map(|record| {
                project_record(record, options.columns.as_deref(), options.rename.as_ref())
            })
            .collect())
    }

    /// Extract all records plus metadata: the resolved format, the row
    /// count, and (for delimited text) the delimiter used for parsing.
    pub fn extract_with_details(
        &self,
        path: impl AsRef<Path>,
        options: &ExtractOptions,
    ) -> ExtractResult<ExtractionDetails> {
        let path = path.as_ref();
        let format = resolve_format(path)?;
        let records = self.extract(path, options)?;
        // Reuses the cached detection performed by the read above.
        let delimiter = match format {
            Format::Delimited => Some(self.resolve_delimiter(path, options)?),
            _ => None,
        };
        Ok(ExtractionDetails {
            row_count: records.len(),
            records,
            format,
            delimiter,
        })
    }

    /// Open a lazy record stream over a file.
    ///
    /// The column projection, when configured, is appended as the final
    /// pending transform stage; without it no pass-through stage is added.
    pub fn extract_as_stream(
        &self,
        path: impl AsRef<Path>,
        options: &ExtractOptions,
    ) -> ExtractResult<RecordStream> {
        let path = path.as_ref();
        let format = resolve_format(path)?;
        let observer = options.resolved_observer();
        let ctx = ExtractContext {
            path: path.to_path_buf(),
            format,
        };

        let result = self.stream_dispatch(path, format, options);
        if let Err(e) = &result {
            observer.on_failure(&ctx, severity_for_error(e), e);
        }
        let mut stream = result?;

        if options.columns.is_some() || options.rename.is_some() {
            let columns = options.columns.clone();
            let rename = options.rename.clone();
            stream.compose(move |record| {
                Some(project_record(record, columns.as_deref(), rename.as_ref()))
            });
        }
        Ok(stream)
    }

    /// Discard all cached delimiter-detection results.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.delimiter_cache.write() {
            cache.clear();
        }
    }

    fn batch_dispatch(
        &self,
        path: &Path,
        format: Format,
        options: &ExtractOptions,
    ) -> ExtractResult<Vec<Record>> {
        match format {
            Format::Delimited => {
                let delimiter = self.resolve_delimiter(path, options)?;
                delimited::batch_read(path, delimiter, options)
            }
            Format::JsonArray => json_array::batch_read(path, options),
            Format::Xlsx => spreadsheet::batch_read_modern(path, options),
            Format::Xls => spreadsheet::batch_read_legacy(path, options),
            Format::Archive => archive::batch_read(path, options, self),
        }
    }

    fn stream_dispatch(
        &self,
        path: &Path,
        format: Format,
        options: &ExtractOptions,
    ) -> ExtractResult<RecordStream> {
        match format {
            Format::Delimited => {
                let delimiter = self.resolve_delimiter(path, options)?;
                delimited::stream_read(path, delimiter, options)
            }
            Format::JsonArray => json_array::stream_read(path, options),
            Format::Xlsx => spreadsheet::stream_read_modern(path, options),
            Format::Xls => spreadsheet::stream_read_legacy(path, options),
            Format::Archive => archive::stream_read(path, options, self),
        }
    }

    /// Resolution order: explicit option, cached detection, comma fallback.
    /// Only successful detections are cached; a no-guess result falls back
    /// to comma without poisoning the cache.
    fn resolve_delimiter(&self, path: &Path, options: &ExtractOptions) -> ExtractResult<u8> {
        if let Some(delimiter) = options.delimiter {
            return Ok(delimiter);
        }
        if let Ok(cache) = self.delimiter_cache.read() {
            if let Some(&delimiter) = cache.get(path) {
                return Ok(delimiter);
            }
        }
        match detection::detect_delimiter_in_file(path)? {
            Some(delimiter) => {
                if let Ok(mut cache) = self.delimiter_cache.write() {
                    cache.insert(path.to_path_buf(), delimiter);
                }
                Ok(delimiter)
            }
            None => Ok(DEFAULT_DELIMITER),
        }
    }
}

impl archive::Delegate for Extractor {
    // Dispatch without the final projection: the outermost extract call
    // projects exactly once over the recursive result.
    fn delegate_batch(&self, path: &Path, options: &ExtractOptions) -> ExtractResult<Vec<Record>> {
        let format = resolve_format(path)?;
        self.batch_dispatch(path, format, options)
    }

    fn delegate_stream(
        &self,
        path: &Path,
        options: &ExtractOptions,
    ) -> ExtractResult<RecordStream> {
        let format = resolve_format(path)?;
        self.stream_dispatch(path, format, options)
    }
}

fn severity_for_error(e: &ExtractError) -> Severity {
    match e {
        ExtractError::Io(_) => Severity::Critical,
        ExtractError::Csv(err) => match err.kind() {
            csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        ExtractError::Zip(zip::result::ZipError::Io(_)) => Severity::Critical,
        ExtractError::Json(err) if err.is_io() => Severity::Critical,
        ExtractError::RowParse { .. } => Severity::Warning,
        _ => Severity::Error,
    }
}

/// One-shot [`Extractor::extract`] with a fresh extractor.
pub fn extract(path: impl AsRef<Path>, options: &ExtractOptions) -> ExtractResult<Vec<Record>> {
    Extractor::new().extract(path, options)
}

/// One-shot [`Extractor::extract_with_details`] with a fresh extractor.
pub fn extract_with_details(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> ExtractResult<ExtractionDetails> {
    Extractor::new().extract_with_details(path, options)
}

/// One-shot [`Extractor::extract_as_stream`] with a fresh extractor.
pub fn extract_as_stream(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> ExtractResult<RecordStream> {
    Extractor::new().extract_as_stream(path, options)
}
