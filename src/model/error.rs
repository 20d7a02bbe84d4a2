//! Error types for venture.
//!
//! The taxonomy is split by where a failure originates:
//!
//! - [`FileLoadError`] - the record source could not open or decode a file
//! - [`PageFetchError`] - the record source could not produce a page or flag a record
//! - [`UnknownColumn`] - a column edit named a column the registry doesn't have
//! - [`ViewError`] - what the view coordinator surfaces (any of the above)
//! - [`AppError`] - top-level failures of the binary
//!
//! # Recovery
//!
//! None of the view-level errors are fatal. The coordinator keeps its last
//! good snapshot and hands the error back to the presentation layer, which
//! shows it and carries on. Nothing is retried automatically.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// Everything `main` can fail with. View errors only reach this level in
/// headless mode; the TUI displays them instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// A load, page fetch or column edit failed.
    #[error("{0}")]
    View(#[from] ViewError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Writing an export failed.
    #[error("Export failed: {0}")]
    Export(#[from] crate::source::export::ExportError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// The record source could not open or parse a file.
///
/// On this error the previously loaded file (if any) stays loaded.
#[derive(Debug, Error)]
pub enum FileLoadError {
    /// The path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use venture::model::error::FileLoadError;
    ///
    /// let err = FileLoadError::NotFound { path: PathBuf::from("/tmp/missing.jsonl") };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// Reading the file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file has content but no line of it is a valid event record.
    #[error("Not an event log: {path} (line {line}: {reason})")]
    Malformed {
        /// The path being read.
        path: PathBuf,
        /// First offending line (1-based).
        line: usize,
        /// Parser message for that line.
        reason: String,
    },

    /// The file has the EVTX signature but its contents can't be decoded.
    #[error("Corrupt event log: {path} ({reason})")]
    Corrupt {
        /// The path being read.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// The background fetch worker is gone.
    #[error("Record source worker is unavailable")]
    WorkerUnavailable,
}

/// The record source could not produce a requested page.
///
/// On this error the controller stays on its last good page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageFetchError {
    /// A page was requested before any file was loaded.
    #[error("No file is loaded")]
    NoFileLoaded,

    /// The page lies outside `[1, last_page]`.
    #[error("Page {page} is out of range (1..={last_page})")]
    OutOfRange {
        /// Requested page.
        page: usize,
        /// Last valid page.
        last_page: usize,
    },

    /// A flag toggle named a record id the open file doesn't have.
    #[error("No record with EventRecordID {record_id}")]
    RecordNotFound {
        /// The id that was not found.
        record_id: u64,
    },

    /// The source could not read the page (file gone, I/O failure).
    #[error("I/O error: {reason}")]
    Io {
        /// What went wrong.
        reason: String,
    },

    /// The background fetch worker is gone.
    #[error("Record source worker is unavailable")]
    WorkerUnavailable,
}

/// A column edit named a column that is not in the registry.
///
/// Usually stale UI state after a new file was opened. The edit is ignored.
///
/// # Examples
///
/// ```
/// use venture::model::error::UnknownColumn;
///
/// let err = UnknownColumn { name: "Host".to_string() };
/// assert_eq!(err.to_string(), "Unknown column: Host");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown column: {name}")]
pub struct UnknownColumn {
    /// The name that was not found.
    pub name: String,
}

/// Errors surfaced by the view coordinator to the presentation layer.
///
/// Always delivered alongside an intact last-known-good snapshot.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Opening a file failed.
    #[error("Failed to open file: {0}")]
    FileLoad(#[from] FileLoadError),

    /// Changing page failed.
    #[error("Failed to fetch page: {0}")]
    PageFetch(#[from] PageFetchError),

    /// A filter edit named an unknown column.
    #[error(transparent)]
    UnknownColumn(#[from] UnknownColumn),

    /// Exporting the open file failed.
    #[error("Export failed: {0}")]
    Export(#[from] crate::source::export::ExportError),
}
