//! Record table widget.
//!
//! One row per displayed record, one column per visible column. Column
//! widths fit the widest cell on the page, bounded by
//! [`MIN_COLUMN_WIDTH`] and [`MAX_COLUMN_WIDTH`]; longer text is cut with an
//! ellipsis on a display-width boundary.
//!
//! When the columns don't fit, the table scrolls sideways so the focused
//! column is always on screen.

use super::constants::{
    COLUMN_SPACING, FILTER_MARKER, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH, SORT_ASCENDING_MARKER,
    SORT_DESCENDING_MARKER,
};
use super::modes::UiState;
use super::styles::TableStyles;
use crate::model::Record;
use crate::state::Snapshot;
use ratatui::{
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Cut `text` to at most `max_width` terminal cells.
///
/// When text is cut the last cell holds an ellipsis.
pub fn truncate_to_width(text: &str, max_width: usize) -> Cow<'_, str> {
    if text.width() <= max_width {
        return Cow::Borrowed(text);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Single-line text of a cell. Absent fields render empty.
pub fn cell_text<'a>(record: &'a Record, column: &str) -> Cow<'a, str> {
    match record.text(column) {
        Some(text) if text.contains(['\n', '\r', '\t']) => {
            Cow::Owned(text.replace(['\n', '\r', '\t'], " "))
        }
        Some(text) => text,
        None => Cow::Borrowed(""),
    }
}

fn header_label(snapshot: &Snapshot, name: &str) -> String {
    let mut label = name.to_string();
    if snapshot.column(name).is_some_and(|c| c.has_filter()) {
        label.push_str(FILTER_MARKER);
    }
    match &snapshot.sort {
        Some(sort) if sort.column == name && sort.ascending => label.push_str(SORT_ASCENDING_MARKER),
        Some(sort) if sort.column == name => label.push_str(SORT_DESCENDING_MARKER),
        _ => {}
    }
    label
}

/// Display width of each visible column for the snapshot's page.
pub fn column_widths(snapshot: &Snapshot) -> Vec<usize> {
    snapshot
        .visible_columns
        .iter()
        .map(|name| {
            let header = header_label(snapshot, name).width();
            let widest_cell = snapshot
                .displayed_records
                .iter()
                .map(|record| cell_text(record, name).width())
                .max()
                .unwrap_or(0);
            header.max(widest_cell).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Index of the first column to draw so that `focused` fits in `available`
/// cells.
///
/// Shows as many columns left of the focused one as fit. Starts at 0 when
/// everything up to the focused column fits.
pub fn first_visible_column(widths: &[usize], focused: usize, available: usize) -> usize {
    let Some(last) = widths.len().checked_sub(1) else {
        return 0;
    };
    let focused = focused.min(last);
    let spacing = usize::from(COLUMN_SPACING);
    let mut start = focused;
    let mut used = widths[focused];
    while start > 0 {
        let next = used + spacing + widths[start - 1];
        if next > available {
            break;
        }
        used = next;
        start -= 1;
    }
    start
}

fn empty_message(snapshot: &Snapshot) -> Option<&'static str> {
    if snapshot.file.is_none() {
        Some("No file open. Press o to open an event log.")
    } else if snapshot.columns.is_empty() {
        Some("The file has no records.")
    } else if snapshot.visible_columns.is_empty() {
        Some("All columns are hidden. Press c to choose columns.")
    } else {
        None
    }
}

/// Render the table (or a placeholder) into `area`.
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    ui: &UiState,
    styles: &TableStyles,
) {
    let title = snapshot
        .file
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|name| format!(" {} ", name.to_string_lossy()))
        .unwrap_or_else(|| " venture ".to_string());
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(message) = empty_message(snapshot) {
        frame.render_widget(Paragraph::new(Line::styled(message, styles.muted)), inner);
        return;
    }

    let widths = column_widths(snapshot);
    let offset = first_visible_column(&widths, ui.focused_column, usize::from(inner.width));
    let shown = &snapshot.visible_columns[offset..];
    let shown_widths = &widths[offset..];

    let header = Row::new(shown.iter().zip(shown_widths).enumerate().map(|(i, (name, &width))| {
        let style = if offset + i == ui.focused_column {
            styles.focused_header
        } else if snapshot.column(name).is_some_and(|c| c.has_filter()) {
            styles.filtered_header
        } else {
            styles.header
        };
        let label = header_label(snapshot, name);
        Cell::from(truncate_to_width(&label, width).into_owned()).style(style)
    }));

    let rows = snapshot.displayed_records.iter().enumerate().map(|(i, record)| {
        let row = Row::new(shown.iter().zip(shown_widths).map(|(name, &width)| {
            let text = cell_text(record, name);
            Cell::from(truncate_to_width(&text, width).into_owned())
        }));
        if i == ui.focused_row {
            row.style(styles.cursor)
        } else if record.is_flagged() {
            row.style(styles.flagged)
        } else {
            row
        }
    });

    let constraints = shown_widths.iter().map(|&w| Constraint::Length(w as u16));
    let table = Table::new(rows, constraints)
        .header(header)
        .column_spacing(COLUMN_SPACING);
    frame.render_widget(table, inner);

    if snapshot.displayed_records.is_empty() {
        let message = if snapshot.has_data() {
            "No records on this page match the active filters."
        } else {
            "The file has no records."
        };
        let below_header = Rect {
            y: inner.y.saturating_add(1),
            height: inner.height.saturating_sub(1),
            ..inner
        };
        frame.render_widget(Paragraph::new(Line::styled(message, styles.muted)), below_header);
    }
}
