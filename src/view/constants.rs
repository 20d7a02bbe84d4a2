//! Layout dimension constants for TUI rendering.

/// Height of the footer in lines (status line + hint/filter line).
pub const FOOTER_HEIGHT: u16 = 2;

/// Height of the open-file and filter prompts (border + input line).
pub const PROMPT_HEIGHT: u16 = 3;

/// Width percentage for the column picker popup.
pub const PICKER_POPUP_WIDTH_PERCENT: u16 = 50;

/// Height percentage for the column picker popup.
pub const PICKER_POPUP_HEIGHT_PERCENT: u16 = 70;

/// Widest a table column gets, in terminal cells.
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Narrowest a table column gets, in terminal cells.
pub const MIN_COLUMN_WIDTH: usize = 3;

/// Marker appended to the header of a column with an active filter.
pub const FILTER_MARKER: &str = "*";

/// Marker appended to the header of the column the pages are sorted by, ascending.
pub const SORT_ASCENDING_MARKER: &str = " ▲";

/// Marker appended to the header of the column the pages are sorted by, descending.
pub const SORT_DESCENDING_MARKER: &str = " ▼";

/// Cells between two table columns.
pub const COLUMN_SPACING: u16 = 1;
