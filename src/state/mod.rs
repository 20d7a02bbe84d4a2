//! View state (pure).
//!
//! Pagination, filtering and request sequencing. Everything here is
//! testable without a terminal; the only I/O goes through [`RecordSource`].
//!
//! [`RecordSource`]: crate::source::RecordSource

pub mod coordinator;
pub mod filter;
pub mod pagination;
pub mod request;

// Re-export for convenience
pub use coordinator::{Completion, Snapshot, ViewCoordinator};
pub use pagination::{PageNav, PageState, PaginationController};
pub use request::{FetchKind, FetchOutcome, FetchRequest, FetchResponse, RequestSeq};
