//! Record sources.
//!
//! A record source opens one event-log file at a time and hands out fixed-size
//! pages of it. Decoding the file is entirely the source's business; the view
//! core only sees [`PageResult`]s.
//!
//! - [`RecordSource`] - the contract the core depends on
//! - [`EventLogSource`] - EVTX and newline-delimited JSON event logs
//! - [`FetchWorker`] - runs a source on a background thread
//! - [`export`] - writing loaded records back out as CSV or JSON

use crate::model::{FileLoadError, PageFetchError, PageResult, SortOrder};
use std::path::Path;

pub mod eventlog;
pub mod evtx;
pub mod export;
pub mod flatten;
pub mod jsonl;
pub mod worker;

pub use eventlog::EventLogSource;
pub use export::{ExportError, ExportFormat};
pub use worker::FetchWorker;

/// Paged access to a single open event-log file.
///
/// `select_page`, `toggle_flag` and `export` always target the file most
/// recently opened by a successful `load_file`. Sources are `Send` so they
/// can live on a [`FetchWorker`] thread.
pub trait RecordSource: Send {
    /// Open `path` and return its first page, in file order.
    ///
    /// The result's `page_number` is 1. On failure the previously open file,
    /// if any, stays open.
    ///
    /// # Errors
    ///
    /// [`FileLoadError`] if the file cannot be read or is not an event log.
    fn load_file(&mut self, path: &Path) -> Result<PageResult, FileLoadError>;

    /// Return page `page` (1-based) of the open file.
    ///
    /// With a sort order the whole file is ordered by it before paging;
    /// without one, pages are in file order.
    ///
    /// # Errors
    ///
    /// [`PageFetchError`] if no file is open or the page doesn't exist.
    fn select_page(&mut self, page: usize, sort: Option<&SortOrder>) -> Result<PageResult, PageFetchError>;

    /// Flip the flag of the record whose `EventRecordID` is `record_id`.
    ///
    /// Returns the record's new flag state.
    ///
    /// # Errors
    ///
    /// [`PageFetchError::RecordNotFound`] for an unknown id,
    /// [`PageFetchError::NoFileLoaded`] before any file is open.
    fn toggle_flag(&mut self, record_id: u64) -> Result<bool, PageFetchError>;

    /// Write every record of the open file to `path`, in file order.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// [`ExportError`] if no file is open or the output can't be written.
    fn export(&self, path: &Path, format: ExportFormat) -> Result<usize, ExportError>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn load_file(&mut self, path: &Path) -> Result<PageResult, FileLoadError> {
        (**self).load_file(path)
    }

    fn select_page(&mut self, page: usize, sort: Option<&SortOrder>) -> Result<PageResult, PageFetchError> {
        (**self).select_page(page, sort)
    }

    fn toggle_flag(&mut self, record_id: u64) -> Result<bool, PageFetchError> {
        (**self).toggle_flag(record_id)
    }

    fn export(&self, path: &Path, format: ExportFormat) -> Result<usize, ExportError> {
        (**self).export(path, format)
    }
}
