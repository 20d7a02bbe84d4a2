//! Sequence-numbered fetch requests.
//!
//! Every load, page change, flag toggle or export the coordinator issues
//! gets a [`RequestSeq`]
//! from a counter that only goes up. Whoever runs the request (inline or on
//! a [`FetchWorker`](crate::source::FetchWorker)) hands back a
//! [`FetchResponse`] carrying the same number, which is how the coordinator
//! tells the latest response from a stale one.

use crate::model::{FileLoadError, PageFetchError, PageResult, SortOrder};
use crate::source::{ExportError, ExportFormat, RecordSource};
use std::fmt;
use std::path::PathBuf;

/// Monotonic request sequence number assigned at issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Wrap a raw sequence number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a request asks the record source to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    /// Open a file and fetch its first page.
    OpenFile(PathBuf),
    /// Fetch a page (1-based) of the open file under a sort order.
    Page {
        /// Page to fetch.
        page: usize,
        /// Order to page in; `None` is file order.
        sort: Option<SortOrder>,
    },
    /// Flip one record's flag, then refetch a page so the change shows.
    ToggleFlag {
        /// `EventRecordID` of the record to flip.
        record_id: u64,
        /// Page to fetch afterwards.
        page: usize,
        /// Order to page in.
        sort: Option<SortOrder>,
    },
    /// Write the open file's records to disk.
    Export {
        /// Output file.
        path: PathBuf,
        /// Output format.
        format: ExportFormat,
    },
}

/// A fetch the coordinator has issued and is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Issue-time sequence number.
    pub seq: RequestSeq,
    /// The operation.
    pub kind: FetchKind,
}

/// Result of a fetch, as reported back to the coordinator.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Outcome of [`FetchKind::OpenFile`].
    FileLoaded {
        /// The file that was opened.
        path: PathBuf,
        /// First page or load failure.
        result: Result<PageResult, FileLoadError>,
    },
    /// Outcome of [`FetchKind::Page`] and [`FetchKind::ToggleFlag`].
    PageFetched {
        /// The page that was requested.
        page: usize,
        /// The page or fetch failure.
        result: Result<PageResult, PageFetchError>,
    },
    /// Outcome of [`FetchKind::Export`].
    Exported {
        /// The file that was written.
        path: PathBuf,
        /// Number of records written, or the failure.
        result: Result<usize, ExportError>,
    },
}

/// A completed fetch, tagged with the sequence number of its request.
#[derive(Debug)]
pub struct FetchResponse {
    /// Sequence number of the request this answers.
    pub seq: RequestSeq,
    /// What happened.
    pub outcome: FetchOutcome,
}

impl FetchRequest {
    /// Run the request against `source`.
    pub fn execute<S: RecordSource + ?Sized>(self, source: &mut S) -> FetchResponse {
        let outcome = match self.kind {
            FetchKind::OpenFile(path) => {
                let result = source.load_file(&path);
                FetchOutcome::FileLoaded { path, result }
            }
            FetchKind::Page { page, sort } => FetchOutcome::PageFetched {
                page,
                result: source.select_page(page, sort.as_ref()),
            },
            FetchKind::ToggleFlag {
                record_id,
                page,
                sort,
            } => FetchOutcome::PageFetched {
                page,
                result: source
                    .toggle_flag(record_id)
                    .and_then(|_| source.select_page(page, sort.as_ref())),
            },
            FetchKind::Export { path, format } => {
                let result = source.export(&path, format);
                FetchOutcome::Exported { path, result }
            }
        };
        FetchResponse {
            seq: self.seq,
            outcome,
        }
    }

    /// Failure response for a request that could not be delivered to a worker.
    pub fn unavailable(self) -> FetchResponse {
        let outcome = match self.kind {
            FetchKind::OpenFile(path) => FetchOutcome::FileLoaded {
                path,
                result: Err(FileLoadError::WorkerUnavailable),
            },
            FetchKind::Page { page, .. } | FetchKind::ToggleFlag { page, .. } => {
                FetchOutcome::PageFetched {
                    page,
                    result: Err(PageFetchError::WorkerUnavailable),
                }
            }
            FetchKind::Export { path, .. } => FetchOutcome::Exported {
                path,
                result: Err(ExportError::WorkerUnavailable),
            },
        };
        FetchResponse {
            seq: self.seq,
            outcome,
        }
    }
}
