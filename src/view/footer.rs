//! Footer: page position, totals, filters, status and key hints.

use super::modes::{StatusMessage, UiState};
use super::styles::TableStyles;
use crate::state::Snapshot;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const KEY_HINTS: &str =
    "q quit  o open  e export  n/p page  g/G first/last  h/l column  j/k row  m flag  s sort  f filter  x clear  d hide  c columns";

/// `Page X of Y | N records | M shown`, plus the sort and loading markers.
pub fn status_line(snapshot: &Snapshot, loading: bool) -> String {
    let mut line = format!(
        "Page {} of {} | {} records | {} shown",
        snapshot.current_page_index,
        snapshot.last_page,
        snapshot.total_records,
        snapshot.displayed_records.len()
    );
    if let Some(sort) = &snapshot.sort {
        let direction = if sort.ascending { "ascending" } else { "descending" };
        line.push_str(&format!(" | sorted by {} {direction}", sort.column));
    }
    if loading {
        line.push_str(" | loading…");
    }
    line
}

/// Active filters as `Name~text`, comma separated. `None` without filters.
pub fn filter_summary(snapshot: &Snapshot) -> Option<String> {
    let parts: Vec<String> = snapshot
        .columns
        .iter()
        .filter(|c| c.has_filter())
        .map(|c| format!("{}~{}", c.name(), c.filter))
        .collect();
    (!parts.is_empty()).then(|| format!("Filters: {}", parts.join(", ")))
}

/// Two-line footer widget.
pub struct Footer<'a> {
    snapshot: &'a Snapshot,
    ui: &'a UiState,
    loading: bool,
    styles: &'a TableStyles,
}

impl<'a> Footer<'a> {
    /// Footer for the given frame state.
    pub fn new(snapshot: &'a Snapshot, ui: &'a UiState, loading: bool, styles: &'a TableStyles) -> Self {
        Self {
            snapshot,
            ui,
            loading,
            styles,
        }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let first = if self.loading {
            let text = status_line(self.snapshot, false);
            Line::from(vec![
                Span::raw(text),
                Span::styled(" | loading…", self.styles.loading),
            ])
        } else {
            Line::raw(status_line(self.snapshot, false))
        };

        let second = match &self.ui.status {
            Some(StatusMessage::Error(message)) => Line::styled(message.clone(), self.styles.error),
            Some(StatusMessage::Info(message)) => Line::raw(message.clone()),
            None => match filter_summary(self.snapshot) {
                Some(filters) => Line::raw(filters),
                None => Line::styled(KEY_HINTS, self.styles.muted),
            },
        };

        Paragraph::new(vec![first, second]).render(area, buf);
    }
}
