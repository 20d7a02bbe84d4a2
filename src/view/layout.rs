//! Screen layout: table on top, optional prompt, footer at the bottom,
//! column picker drawn over everything.

use super::constants::{FOOTER_HEIGHT, PROMPT_HEIGHT};
use super::footer::Footer;
use super::modes::{InputMode, UiState};
use super::picker::render_column_picker;
use super::prompt::Prompt;
use super::styles::TableStyles;
use super::table::render_table;
use crate::state::Snapshot;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAreas {
    /// Record table.
    pub table: Rect,
    /// Input prompt, when a prompt mode is active.
    pub prompt: Option<Rect>,
    /// Footer.
    pub footer: Rect,
}

/// Split `area` for the given mode.
pub fn calculate_areas(area: Rect, mode: &InputMode) -> FrameAreas {
    if mode.is_prompt() {
        let [table, prompt, footer] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(PROMPT_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(area);
        FrameAreas {
            table,
            prompt: Some(prompt),
            footer,
        }
    } else {
        let [table, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)]).areas(area);
        FrameAreas {
            table,
            prompt: None,
            footer,
        }
    }
}

/// Draw a full frame.
pub fn render_layout(
    frame: &mut Frame,
    snapshot: &Snapshot,
    ui: &UiState,
    loading: bool,
    styles: &TableStyles,
) {
    let areas = calculate_areas(frame.area(), &ui.mode);

    render_table(frame, areas.table, snapshot, ui, styles);
    if let Some(prompt) = areas.prompt {
        frame.render_widget(Prompt::new(&ui.mode), prompt);
    }
    frame.render_widget(Footer::new(snapshot, ui, loading, styles), areas.footer);

    if let InputMode::ColumnPicker(picker) = &ui.mode {
        render_column_picker(frame, picker, styles);
    }
}
