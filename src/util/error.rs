// Casetrail - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; all errors preserve the causal
// chain for diagnostic logging.

use crate::core::model::EntryId;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Casetrail operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CasetrailError {
    /// Timeline mutation rejected (validation or unknown entry).
    Timeline(TimelineError),

    /// Persistence operation failed.
    Store(StoreError),

    /// CSV import failed.
    Import(ImportError),

    /// Export serialisation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for CasetrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeline(e) => write!(f, "Timeline error: {e}"),
            Self::Store(e) => write!(f, "Store error: {e}"),
            Self::Import(e) => write!(f, "Import error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CasetrailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timeline(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Import(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline errors
// ---------------------------------------------------------------------------

/// Errors raised by timeline mutations. Recovery is always local: the
/// single operation is rejected and no partial mutation occurs.
#[derive(Debug)]
pub enum TimelineError {
    /// A required field was blank on insert or update.
    EmptyField { field: &'static str },

    /// Update or delete referenced an entry id that is not in the timeline.
    NotFound { id: EntryId },

    /// The investigation name failed validation.
    InvalidName { name: String, reason: &'static str },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be blank"),
            Self::NotFound { id } => write!(f, "no entry with id {id}"),
            Self::InvalidName { name, reason } => {
                write!(f, "invalid investigation name '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for TimelineError {}

impl From<TimelineError> for CasetrailError {
    fn from(e: TimelineError) -> Self {
        Self::Timeline(e)
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors raised by snapshot and report persistence. All are non-fatal to
/// the in-memory timeline: a failed disk write never discards or corrupts
/// in-memory state, and the next mutation's snapshot write retries
/// implicitly via the overwrite-on-mutation pattern.
#[derive(Debug)]
pub enum StoreError {
    /// Could not create the investigation directory.
    CreateDir { path: PathBuf, source: io::Error },

    /// Snapshot or report file write failed.
    Write { path: PathBuf, source: io::Error },

    /// Could not finalise an atomic write (rename of the temp file).
    Finalise { path: PathBuf, source: io::Error },

    /// Could not delete the snapshot of an emptied timeline.
    Delete { path: PathBuf, source: io::Error },

    /// CSV serialisation of the snapshot failed.
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => write!(
                f,
                "cannot create investigation directory '{}': {source}",
                path.display()
            ),
            Self::Write { path, source } => {
                write!(f, "cannot write '{}': {source}", path.display())
            }
            Self::Finalise { path, source } => {
                write!(f, "cannot finalise write of '{}': {source}", path.display())
            }
            Self::Delete { path, source } => {
                write!(f, "cannot delete '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV snapshot error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. }
            | Self::Write { source, .. }
            | Self::Finalise { source, .. }
            | Self::Delete { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for CasetrailError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Errors raised by CSV import. Individual malformed rows are skipped and
/// counted, not raised; these variants cover failures of the import as a
/// whole.
#[derive(Debug)]
pub enum ImportError {
    /// The CSV reader itself failed (malformed framing, I/O on the reader).
    Csv { source: csv::Error },

    /// The file has no header row with the expected columns.
    MissingHeader { expected: &'static str },

    /// The import exceeded the maximum allowed row count.
    TooManyRows { max: usize },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv { source } => write!(f, "cannot read CSV: {source}"),
            Self::MissingHeader { expected } => {
                write!(f, "CSV is missing required column '{expected}'")
            }
            Self::TooManyRows { max } => {
                write!(f, "import aborted: more than {max} rows")
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ImportError> for CasetrailError {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export stream.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "export I/O error: {source}"),
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for CasetrailError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for Casetrail results.
pub type Result<T> = std::result::Result<T, CasetrailError>;
