//! Column picker overlay.
//!
//! Centered popup listing every column with a checkbox. Space toggles,
//! Enter applies, Esc discards.

use super::constants::{PICKER_POPUP_HEIGHT_PERCENT, PICKER_POPUP_WIDTH_PERCENT};
use super::modes::ColumnPicker;
use super::styles::TableStyles;
use ratatui::{
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the picker centered over the frame.
pub fn render_column_picker(frame: &mut Frame, picker: &ColumnPicker, styles: &TableStyles) {
    let popup_area = centered_rect(
        PICKER_POPUP_WIDTH_PERCENT,
        PICKER_POPUP_HEIGHT_PERCENT,
        frame.area(),
    );
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Columns (Space toggle, Enter apply, Esc cancel) ")
        .borders(Borders::ALL);
    let inner = block.inner(popup_area);

    // Keep the cursor in view on long column lists.
    let visible_rows = usize::from(inner.height.max(1));
    let offset = picker.cursor().saturating_sub(visible_rows - 1);

    let lines: Vec<Line> = picker
        .entries()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(i, (name, selected))| {
            let mark = if *selected { "[x]" } else { "[ ]" };
            let text = format!("{mark} {name}");
            if i == picker.cursor() {
                Line::styled(text, styles.cursor)
            } else {
                Line::raw(text)
            }
        })
        .collect();

    let body = if lines.is_empty() {
        Paragraph::new(Line::styled("No columns", styles.muted)).alignment(Alignment::Center)
    } else {
        Paragraph::new(lines)
    };
    frame.render_widget(body.block(block), popup_area);
}

/// Rect of `percent_x` × `percent_y` of `area`, centered in it.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_width = area.width * percent_x / 100;
    let popup_height = area.height * percent_y / 100;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    Rect {
        x: area.x + popup_x,
        y: area.y + popup_y,
        width: popup_width,
        height: popup_height,
    }
}
