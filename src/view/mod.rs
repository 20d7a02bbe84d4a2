//! TUI rendering and terminal management (impure shell)
//!
//! The event loop owns a [`ViewCoordinator`] and a [`FetchWorker`]. Keys
//! turn into coordinator requests, requests go to the worker, and finished
//! responses are drained back into the coordinator on every tick. The
//! screen is always drawn from the coordinator's last snapshot.

pub mod constants;
pub mod footer;
pub mod layout;
pub mod modes;
mod picker;
mod prompt;
pub mod styles;
pub mod table;

pub use modes::{ColumnPicker, InputMode, StatusMessage, UiState};
pub use styles::{ColorConfig, TableStyles};

use crate::config::keybindings::KeyBindings;
use crate::model::{AppError, KeyAction};
use crate::source::{ExportFormat, FetchWorker, RecordSource};
use crate::state::{Completion, FetchRequest, FetchResponse, PageNav, ViewCoordinator};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Startup options for the TUI.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// File to open on start.
    pub initial_file: Option<PathBuf>,
    /// Columns deselected after every load.
    pub hidden_columns: Vec<String>,
    /// Key map.
    pub key_bindings: KeyBindings,
    /// Color output.
    pub colors: ColorConfig,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    coordinator: ViewCoordinator,
    worker: FetchWorker,
    key_bindings: KeyBindings,
    styles: TableStyles,
    ui: UiState,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new<S>(source: S, options: ViewOptions) -> Result<Self, TuiError>
    where
        S: RecordSource + 'static,
    {
        let worker = FetchWorker::spawn(source)?;

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self::with_parts(terminal, worker, options))
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Worker responses are drained
    /// every tick, so a slow load never blocks typing.
    pub fn run(&mut self) -> Result<(), TuiError> {
        const TICK: Duration = Duration::from_millis(100);

        self.draw()?;

        loop {
            let mut dirty = false;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Resize(..) => dirty = true,
                    _ => {}
                }
            }

            if self.drain_responses() {
                dirty = true;
            }

            if dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn with_parts(terminal: Terminal<B>, worker: FetchWorker, options: ViewOptions) -> Self {
        let mut app = Self {
            terminal,
            coordinator: ViewCoordinator::new().with_hidden_columns(options.hidden_columns),
            worker,
            key_bindings: options.key_bindings,
            styles: TableStyles::with_color_config(options.colors),
            ui: UiState::default(),
        };
        if let Some(path) = options.initial_file {
            let request = app.coordinator.request_open_file(path);
            app.dispatch(request);
        }
        app
    }

    /// Send a request to the worker.
    ///
    /// A dead worker answers immediately with its failure response.
    fn dispatch(&mut self, request: FetchRequest) {
        if let Err(response) = self.worker.submit(request) {
            self.apply(*response);
        }
    }

    /// Apply every response the worker has finished. Returns true if any
    /// arrived.
    fn drain_responses(&mut self) -> bool {
        let mut any = false;
        while let Some(response) = self.worker.try_recv() {
            self.apply(response);
            any = true;
        }
        any
    }

    fn apply(&mut self, response: FetchResponse) {
        match self.coordinator.complete(response) {
            Ok(Completion::Applied) => {
                self.ui.status = None;
                self.ui.clamp_focus(self.coordinator.snapshot());
            }
            Ok(Completion::Discarded) => {}
            Ok(Completion::Exported { records }) => {
                self.ui.status = Some(StatusMessage::Info(format!("Exported {records} records")));
            }
            Err(e) => {
                warn!(error = %e, "Showing error in footer");
                self.ui.status = Some(StatusMessage::Error(e.to_string()));
                // A failed open can still switch files.
                self.ui.clamp_focus(self.coordinator.snapshot());
            }
        }
    }

    fn navigate(&mut self, nav: PageNav) {
        if let Some(request) = self.coordinator.request_navigation(nav) {
            self.dispatch(request);
        }
    }

    fn sort_focused(&mut self) {
        let Some(column) = self
            .ui
            .focused_name(self.coordinator.snapshot())
            .map(str::to_string)
        else {
            return;
        };
        match self.coordinator.request_sort(&column) {
            Ok(Some(request)) => self.dispatch(request),
            Ok(None) => {}
            Err(e) => self.ui.status = Some(StatusMessage::Error(e.to_string())),
        }
    }

    fn flag_focused(&mut self) {
        let snapshot = self.coordinator.snapshot();
        let Some(record) = snapshot.displayed_records.get(self.ui.focused_row) else {
            return;
        };
        let Some(record_id) = record.record_id() else {
            self.ui.status = Some(StatusMessage::Error(
                "Record has no EventRecordID to flag".to_string(),
            ));
            return;
        };
        if let Some(request) = self.coordinator.request_toggle_flag(record_id) {
            self.dispatch(request);
        }
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C always quits, whatever the mode or bindings.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match self.ui.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::OpenFile { .. } | InputMode::Filter { .. } | InputMode::Export { .. } => {
                self.handle_prompt_key(key);
                false
            }
            InputMode::ColumnPicker(_) => {
                self.handle_picker_key(key);
                false
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        debug!(?action, "Key action");
        self.ui.status = None;

        match action {
            KeyAction::Quit => return true,
            KeyAction::FirstPage => self.navigate(PageNav::First),
            KeyAction::PreviousPage => self.navigate(PageNav::Previous),
            KeyAction::NextPage => self.navigate(PageNav::Next),
            KeyAction::LastPage => self.navigate(PageNav::Last),
            KeyAction::FocusPrevColumn => self.ui.focus_prev(),
            KeyAction::FocusNextColumn => self.ui.focus_next(self.coordinator.snapshot()),
            KeyAction::PickColumns => {
                self.ui.mode =
                    InputMode::ColumnPicker(ColumnPicker::from_registry(self.coordinator.registry()));
            }
            KeyAction::SortColumn => self.sort_focused(),
            KeyAction::HideColumn => {
                let focused = self
                    .ui
                    .focused_name(self.coordinator.snapshot())
                    .map(str::to_string);
                if let Some(column) = focused {
                    match self.coordinator.toggle_column(&column) {
                        Ok(snapshot) => self.ui.clamp_focus(snapshot),
                        Err(e) => self.ui.status = Some(StatusMessage::Error(e.to_string())),
                    }
                }
            }
            KeyAction::FocusPrevRow => self.ui.focus_row_up(),
            KeyAction::FocusNextRow => self.ui.focus_row_down(self.coordinator.snapshot()),
            KeyAction::ToggleFlag => self.flag_focused(),
            KeyAction::EditFilter => {
                if let Some(column) = self.ui.focused_name(self.coordinator.snapshot()) {
                    self.ui.mode = InputMode::Filter {
                        column: column.to_string(),
                        fragment: String::new(),
                    };
                }
            }
            KeyAction::ClearFilter => {
                let focused = self
                    .ui
                    .focused_name(self.coordinator.snapshot())
                    .map(str::to_string);
                if let Some(column) = focused {
                    if let Err(e) = self.coordinator.clear_column_filter(&column) {
                        self.ui.status = Some(StatusMessage::Error(e.to_string()));
                    }
                }
            }
            KeyAction::OpenFile => {
                self.ui.mode = InputMode::OpenFile {
                    path: String::new(),
                };
            }
            KeyAction::Export => {
                if self.coordinator.file().is_some() {
                    self.ui.mode = InputMode::Export {
                        path: String::new(),
                    };
                }
            }
        }
        false
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.ui.mode = InputMode::Normal,
            KeyCode::Enter => {
                let mode = std::mem::take(&mut self.ui.mode);
                self.submit_prompt(mode);
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.ui.mode.buffer_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(buffer) = self.ui.mode.buffer_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_prompt(&mut self, mode: InputMode) {
        match mode {
            InputMode::OpenFile { path } => {
                let path = path.trim();
                if path.is_empty() {
                    return;
                }
                info!(path, "Opening file from prompt");
                self.ui.status = Some(StatusMessage::Info(format!("Opening {path}")));
                let request = self.coordinator.request_open_file(path);
                self.dispatch(request);
            }
            InputMode::Filter { column, fragment } => {
                if fragment.is_empty() {
                    return;
                }
                if let Err(e) = self.coordinator.append_column_filter(&column, &fragment) {
                    self.ui.status = Some(StatusMessage::Error(e.to_string()));
                }
            }
            InputMode::Export { path } => {
                let path = PathBuf::from(path.trim());
                if path.as_os_str().is_empty() {
                    return;
                }
                let format = ExportFormat::from_path(&path);
                info!(path = %path.display(), ?format, "Exporting from prompt");
                self.ui.status = Some(StatusMessage::Info(format!("Exporting to {}", path.display())));
                if let Some(request) = self.coordinator.request_export(path, format) {
                    self.dispatch(request);
                }
            }
            InputMode::Normal | InputMode::ColumnPicker(_) => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let InputMode::ColumnPicker(picker) = &mut self.ui.mode else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => picker.move_up(),
            KeyCode::Down | KeyCode::Char('j') => picker.move_down(),
            KeyCode::Char(' ') => picker.toggle(),
            KeyCode::Esc => self.ui.mode = InputMode::Normal,
            KeyCode::Enter => {
                let names = picker.selected_names();
                self.ui.mode = InputMode::Normal;
                let snapshot = self.coordinator.set_column_selection(names);
                self.ui.clamp_focus(snapshot);
            }
            _ => {}
        }
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let loading = self.coordinator.is_loading();
        self.terminal.draw(|frame| {
            layout::render_layout(
                frame,
                self.coordinator.snapshot(),
                &self.ui,
                loading,
                &self.styles,
            );
        })?;
        Ok(())
    }
}

/// Initialize and run the TUI over `source`
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// on exit, including when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_source<S>(source: S, options: ViewOptions) -> Result<(), TuiError>
where
    S: RecordSource + 'static,
{
    let mut app = TuiApp::new(source, options)?;

    let result = app.run();

    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
