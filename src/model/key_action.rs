//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Pagination
    /// Go to the first page. Default: g/Home
    FirstPage,
    /// Go to the previous page. Default: p/←/Page Up
    PreviousPage,
    /// Go to the next page. Default: n/→/Page Down
    NextPage,
    /// Go to the last page. Default: G/End
    LastPage,

    // Columns
    /// Move column focus left. Default: h
    FocusPrevColumn,
    /// Move column focus right. Default: l/Tab
    FocusNextColumn,
    /// Open the column picker. Default: c
    PickColumns,
    /// Cycle the sort on the focused column (ascending, descending, off). Default: s
    SortColumn,
    /// Hide the focused column. Default: d
    HideColumn,

    // Rows
    /// Move the row cursor up. Default: k/↑
    FocusPrevRow,
    /// Move the row cursor down. Default: j/↓
    FocusNextRow,
    /// Flag or unflag the record under the row cursor. Default: m/Space
    ToggleFlag,

    // Filters
    /// Start typing a filter fragment for the focused column. Default: f//
    EditFilter,
    /// Clear the focused column's filter. Default: x
    ClearFilter,

    // Application
    /// Prompt for a file to open. Default: o
    OpenFile,
    /// Prompt for a path to export the open file to. Default: e
    Export,
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}
