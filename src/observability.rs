use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ExtractError;
use crate::types::Format;

/// Severity classification used for observer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. a skipped row).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about an extraction attempt.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// The input path used for extraction.
    pub path: PathBuf,
    /// Resolved format.
    pub format: Format,
}

/// Minimal stats reported on successful extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    /// Number of extracted rows.
    pub rows: usize,
}

/// Observer interface for extraction outcomes.
///
/// Implementors can record metrics, logs, or collect skipped-row warnings.
pub trait ExtractObserver: Send + Sync {
    /// Called when a batch extraction succeeds.
    fn on_success(&self, _ctx: &ExtractContext, _stats: ExtractStats) {}

    /// Called when extraction fails.
    fn on_failure(&self, _ctx: &ExtractContext, _severity: Severity, _error: &ExtractError) {}

    /// Called when a single row fails to parse and is skipped.
    ///
    /// The error is always an [`ExtractError::RowParse`]; extraction
    /// continues with the next row.
    fn on_row_skipped(&self, _ctx: &ExtractContext, _error: &ExtractError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ExtractObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ExtractObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ExtractObserver for CompositeObserver {
    fn on_success(&self, ctx: &ExtractContext, stats: ExtractStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ExtractContext, severity: Severity, error: &ExtractError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_row_skipped(&self, ctx: &ExtractContext, error: &ExtractError) {
        for o in &self.observers {
            o.on_row_skipped(ctx, error);
        }
    }
}

/// Logs extraction events to stderr.
///
/// This is the default sink for skipped-row warnings when no observer is
/// configured.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ExtractObserver for StdErrObserver {
    fn on_success(&self, ctx: &ExtractContext, stats: ExtractStats) {
        eprintln!(
            "[extract][ok] format={:?} path={} rows={}",
            ctx.format,
            ctx.path.display(),
            stats.rows
        );
    }

    fn on_failure(&self, ctx: &ExtractContext, severity: Severity, error: &ExtractError) {
        eprintln!(
            "[extract][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }

    fn on_row_skipped(&self, ctx: &ExtractContext, error: &ExtractError) {
        eprintln!(
            "[extract][skip] format={:?} path={} {}",
            ctx.format,
            ctx.path.display(),
            error
        );
    }
}
