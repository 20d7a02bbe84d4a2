//! Interaction state of the terminal shell (pure).
//!
//! Which prompt or overlay is open, which column and row have focus and
//! what the status line says. Nothing here touches the coordinator; the shell reads
//! the outcome of each key and forwards it.

use crate::model::ColumnRegistry;
use crate::state::Snapshot;

/// What the keyboard currently drives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys go through the key bindings.
    #[default]
    Normal,
    /// Typing a path to open.
    OpenFile {
        /// Text typed so far.
        path: String,
    },
    /// Typing a fragment to append to a column's filter.
    Filter {
        /// Column being filtered.
        column: String,
        /// Text typed so far.
        fragment: String,
    },
    /// Typing the path to export the open file to.
    Export {
        /// Text typed so far.
        path: String,
    },
    /// Column picker overlay.
    ColumnPicker(ColumnPicker),
}

impl InputMode {
    /// The text buffer of a prompt mode.
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::OpenFile { path } | Self::Export { path } => Some(path),
            Self::Filter { fragment, .. } => Some(fragment),
            Self::Normal | Self::ColumnPicker(_) => None,
        }
    }

    /// True for the text prompts.
    pub fn is_prompt(&self) -> bool {
        matches!(self, Self::OpenFile { .. } | Self::Filter { .. } | Self::Export { .. })
    }
}

/// Pending selection edits, applied all at once on confirm.
///
/// Entries are listed alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPicker {
    entries: Vec<(String, bool)>,
    cursor: usize,
}

impl ColumnPicker {
    /// Picker seeded from the registry's current selection.
    pub fn from_registry(registry: &ColumnRegistry) -> Self {
        let entries = registry
            .sorted_names()
            .into_iter()
            .map(|name| {
                let selected = registry.get(name).is_some_and(|c| c.selected);
                (name.to_string(), selected)
            })
            .collect();
        Self { entries, cursor: 0 }
    }

    /// `(name, selected)` pairs in display order.
    pub fn entries(&self) -> &[(String, bool)] {
        &self.entries
    }

    /// Index of the highlighted entry.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the highlight up one entry.
    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the highlight down one entry.
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Flip the highlighted entry.
    pub fn toggle(&mut self) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            entry.1 = !entry.1;
        }
    }

    /// Names marked as selected.
    pub fn selected_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// One-line message shown in the footer until the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Informational.
    Info(String),
    /// A surfaced error.
    Error(String),
}

/// Everything the shell tracks besides the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Active mode.
    pub mode: InputMode,
    /// Index into the snapshot's visible columns.
    pub focused_column: usize,
    /// Index into the snapshot's displayed records.
    pub focused_row: usize,
    /// Footer message, if any.
    pub status: Option<StatusMessage>,
}

impl UiState {
    /// Name of the focused visible column.
    pub fn focused_name<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a str> {
        snapshot
            .visible_columns
            .get(self.focused_column)
            .map(String::as_str)
    }

    /// Move focus one column left.
    pub fn focus_prev(&mut self) {
        self.focused_column = self.focused_column.saturating_sub(1);
    }

    /// Move focus one column right, stopping at the last visible column.
    pub fn focus_next(&mut self, snapshot: &Snapshot) {
        if self.focused_column + 1 < snapshot.visible_columns.len() {
            self.focused_column += 1;
        }
    }

    /// Move the row cursor one record up.
    pub fn focus_row_up(&mut self) {
        self.focused_row = self.focused_row.saturating_sub(1);
    }

    /// Move the row cursor one record down, stopping at the last displayed one.
    pub fn focus_row_down(&mut self, snapshot: &Snapshot) {
        if self.focused_row + 1 < snapshot.displayed_records.len() {
            self.focused_row += 1;
        }
    }

    /// Keep column and row focus inside the snapshot after it changed.
    pub fn clamp_focus(&mut self, snapshot: &Snapshot) {
        let visible = snapshot.visible_columns.len();
        if self.focused_column >= visible {
            self.focused_column = visible.saturating_sub(1);
        }
        let rows = snapshot.displayed_records.len();
        if self.focused_row >= rows {
            self.focused_row = rows.saturating_sub(1);
        }
    }
}
