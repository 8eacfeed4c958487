//! ZIP archive extraction.
//!
//! Exactly one entry is extracted per call: selected by explicit index, by
//! name-substring match, or (default) the first non-directory entry. The
//! selected entry is materialized to a transient file in the process temp
//! directory and the extraction pipeline is invoked recursively on it with
//! the same options, so nested row limits, header modes, and so on still
//! apply. The transient file is removed on every exit path: for batch reads
//! once the recursive call returns, for stream reads when the stream handle
//! is dropped (including early consumer stops).

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ExtractError, ExtractResult};
use crate::stream::RecordStream;
use crate::types::{ArchiveTarget, ExtractOptions, Format, Record};

/// Interface through which the archive reader re-enters the extraction
/// pipeline for the materialized entry.
///
/// Injected rather than referenced concretely so this module does not depend
/// on the orchestrator type; the run-time call graph is recursive but the
/// type-level dependency graph stays acyclic. Implementations run the
/// resolve-and-read pipeline without the final column projection, which the
/// outermost call applies exactly once.
pub trait Delegate {
    /// Batch-extract the materialized entry.
    fn delegate_batch(&self, path: &Path, options: &ExtractOptions) -> ExtractResult<Vec<Record>>;

    /// Stream-extract the materialized entry.
    fn delegate_stream(&self, path: &Path, options: &ExtractOptions)
        -> ExtractResult<RecordStream>;
}

/// Extract one entry and batch-read it through the delegate.
pub fn batch_read(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
    delegate: &dyn Delegate,
) -> ExtractResult<Vec<Record>> {
    let artifact = materialize_entry(path.as_ref(), options.archive_target.as_ref())?;
    // The transient file is removed when `artifact` drops, on success and
    // error alike.
    delegate.delegate_batch(artifact.path(), options)
}

/// Extract one entry and stream-read it through the delegate.
pub fn stream_read(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
    delegate: &dyn Delegate,
) -> ExtractResult<RecordStream> {
    let artifact = materialize_entry(path.as_ref(), options.archive_target.as_ref())?;
    let inner = delegate.delegate_stream(artifact.path(), options)?;

    // The transient file must outlive the lazy source; the guard rides along
    // inside the stream and deletes it on drop.
    let source = GuardedRows {
        inner,
        _artifact: artifact,
    };
    Ok(RecordStream::new(Box::new(source), Format::Archive))
}

struct GuardedRows {
    inner: RecordStream,
    _artifact: TempArtifact,
}

impl Iterator for GuardedRows {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.inner.next()
    }
}

/// A transient file removed when the guard drops.
struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn materialize_entry(
    archive_path: &Path,
    target: Option<&ArchiveTarget>,
) -> ExtractResult<TempArtifact> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let index = select_entry(&mut archive, target).ok_or_else(|| ExtractError::NoEntryFound {
        path: archive_path.to_path_buf(),
    })?;
    let mut entry = archive.by_index(index)?;

    // Keep the entry's file name (and with it the extension, which drives
    // the recursive format resolution); the timestamp prevents collisions
    // between concurrent extractions.
    let entry_name = Path::new(entry.name())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "entry".to_string());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_path = std::env::temp_dir().join(format!("tabular-extract-{nanos}-{entry_name}"));

    let artifact = TempArtifact { path: temp_path };
    let mut out = File::create(artifact.path())?;
    std::io::copy(&mut entry, &mut out)?;
    Ok(artifact)
}

fn select_entry(archive: &mut zip::ZipArchive<File>, target: Option<&ArchiveTarget>) -> Option<usize> {
    match target {
        Some(ArchiveTarget::Index(index)) => (*index < archive.len()).then_some(*index),
        Some(ArchiveTarget::Name(needle)) => (0..archive.len()).find(|&i| {
            archive
                .by_index(i)
                .map(|entry| entry.name().contains(needle.as_str()))
                .unwrap_or(false)
        }),
        None => (0..archive.len()).find(|&i| {
            archive
                .by_index(i)
                .map(|entry| entry.is_file())
                .unwrap_or(false)
        }),
    }
}
