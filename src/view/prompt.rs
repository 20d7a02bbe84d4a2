//! Single-line input prompt for the open-file, filter and export modes.

use super::modes::InputMode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Prompt widget. Renders nothing outside the prompt modes.
pub struct Prompt<'a> {
    mode: &'a InputMode,
}

impl<'a> Prompt<'a> {
    /// Prompt for the given mode.
    pub fn new(mode: &'a InputMode) -> Self {
        Self { mode }
    }
}

impl Widget for Prompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, text) = match self.mode {
            InputMode::OpenFile { path } => (" Open file (Enter to load, Esc to cancel) ".to_string(), path),
            InputMode::Filter { column, fragment } => {
                (format!(" Filter {column} (Enter to apply, Esc to cancel) "), fragment)
            }
            InputMode::Export { path } => {
                (" Export to (.csv or .json; Enter to write, Esc to cancel) ".to_string(), path)
            }
            InputMode::Normal | InputMode::ColumnPicker(_) => return,
        };

        // Cursor sits after the text; editing is append-only.
        let line = Line::from(vec![
            Span::raw(text.as_str()),
            Span::styled(
                " ",
                Style::default()
                    .bg(Color::White)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(area, buf);
    }
}
