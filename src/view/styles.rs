//! Table and footer styling.
//!
//! Colors are on by default and turned off by `--no-color` or `NO_COLOR`.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Colors forced on or off, ignoring the environment.
    pub fn fixed(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self::fixed(true)
    }
}

// ===== TableStyles =====

/// Styles used by the table, prompts and footer.
///
/// Focus and selection use modifiers only, so they stay visible without
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyles {
    /// Header cell of an unfocused column.
    pub header: Style,
    /// Header cell of the focused column.
    pub focused_header: Style,
    /// Header cell of a column with an active filter.
    pub filtered_header: Style,
    /// Footer error text.
    pub error: Style,
    /// Hints and secondary text.
    pub muted: Style,
    /// Loading indicator.
    pub loading: Style,
    /// Highlighted picker entry and the table's row cursor.
    pub cursor: Style,
    /// Rows of flagged records.
    pub flagged: Style,
}

impl TableStyles {
    /// Styles for the given color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let reversed = Style::default().add_modifier(Modifier::REVERSED);
        if config.colors_enabled() {
            Self {
                header: bold.fg(Color::Cyan),
                focused_header: reversed.add_modifier(Modifier::BOLD).fg(Color::Cyan),
                filtered_header: bold.fg(Color::Yellow),
                error: Style::default().fg(Color::Red),
                muted: Style::default().fg(Color::DarkGray),
                loading: Style::default().fg(Color::Yellow),
                cursor: reversed,
                flagged: bold.fg(Color::Magenta),
            }
        } else {
            Self {
                header: bold,
                focused_header: reversed.add_modifier(Modifier::BOLD),
                filtered_header: bold.add_modifier(Modifier::UNDERLINED),
                error: bold,
                muted: Style::default(),
                loading: Style::default(),
                cursor: reversed,
                flagged: bold,
            }
        }
    }
}

impl Default for TableStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::default())
    }
}

// ===== Tests =====
