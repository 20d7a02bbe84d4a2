//! Domain model types (pure).
//!
//! All types in this module are pure data; no I/O happens here.

pub mod column;
pub mod error;
pub mod key_action;
pub mod page;
pub mod record;
pub mod sort;

// Re-export for convenience
pub use column::{Column, ColumnRegistry};
pub use error::{AppError, FileLoadError, PageFetchError, UnknownColumn, ViewError};
pub use key_action::KeyAction;
pub use page::{last_page, PageResult, DEFAULT_PAGE_SIZE};
pub use record::{render_value, Record, FLAGGED_FIELD, RECORD_ID_FIELD, SOURCE_FILE_FIELD};
pub use sort::SortOrder;
