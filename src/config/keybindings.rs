//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Defaults are pager-style: `n`/`p` flip pages, `h`/`l` move between
/// columns, `j`/`k` move between rows, `f` starts a filter on the focused
/// column.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(key, action);
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };
        let plain = |c: char| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        let code = |c: KeyCode| KeyEvent::new(c, KeyModifiers::NONE);

        // Pagination
        keys.bind(plain('g'), KeyAction::FirstPage);
        keys.bind(code(KeyCode::Home), KeyAction::FirstPage);
        keys.bind(plain('p'), KeyAction::PreviousPage);
        keys.bind(code(KeyCode::Left), KeyAction::PreviousPage);
        keys.bind(code(KeyCode::PageUp), KeyAction::PreviousPage);
        keys.bind(plain('n'), KeyAction::NextPage);
        keys.bind(code(KeyCode::Right), KeyAction::NextPage);
        keys.bind(code(KeyCode::PageDown), KeyAction::NextPage);
        keys.bind(
            KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT),
            KeyAction::LastPage,
        );
        keys.bind(code(KeyCode::End), KeyAction::LastPage);

        // Columns
        keys.bind(plain('h'), KeyAction::FocusPrevColumn);
        keys.bind(
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            KeyAction::FocusPrevColumn,
        );
        keys.bind(plain('l'), KeyAction::FocusNextColumn);
        keys.bind(code(KeyCode::Tab), KeyAction::FocusNextColumn);
        keys.bind(plain('c'), KeyAction::PickColumns);
        keys.bind(plain('s'), KeyAction::SortColumn);
        keys.bind(plain('d'), KeyAction::HideColumn);

        // Rows
        keys.bind(plain('k'), KeyAction::FocusPrevRow);
        keys.bind(code(KeyCode::Up), KeyAction::FocusPrevRow);
        keys.bind(plain('j'), KeyAction::FocusNextRow);
        keys.bind(code(KeyCode::Down), KeyAction::FocusNextRow);
        keys.bind(plain('m'), KeyAction::ToggleFlag);
        keys.bind(plain(' '), KeyAction::ToggleFlag);

        // Filters
        keys.bind(plain('f'), KeyAction::EditFilter);
        keys.bind(plain('/'), KeyAction::EditFilter);
        keys.bind(plain('x'), KeyAction::ClearFilter);

        // Application
        keys.bind(plain('o'), KeyAction::OpenFile);
        keys.bind(plain('e'), KeyAction::Export);
        keys.bind(plain('q'), KeyAction::Quit);
        keys.bind(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyAction::Quit,
        );

        keys
    }
}
