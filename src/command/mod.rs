//! Command dispatch system
//!
//! This module provides the key binding table and command implementations.
//! Commands are organized into submodules by category.

mod editing;
mod files;
mod misc;
mod navigation;
mod run;

use std::collections::HashMap;

use crate::editor::Editor;
use crate::error::Result;
use crate::input::Key;

/// Command result status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    Abort,
}

/// Command function signature
pub type CommandFn = fn(&mut Editor) -> Result<CommandStatus>;

/// Key binding entry with command function and name
struct BindingEntry {
    function: CommandFn,
    name: &'static str,
}

/// Key binding table
pub struct KeyTable {
    bindings: HashMap<Key, BindingEntry>,
}

impl KeyTable {
    /// Create an empty key table
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create key table with default bindings
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.setup_defaults();
        table
    }

    /// Add a key binding with command name
    pub fn bind_named(&mut self, key: Key, cmd: CommandFn, name: &'static str) {
        self.bindings.insert(key, BindingEntry { function: cmd, name });
    }

    /// Look up a command for a key
    pub fn lookup(&self, key: Key) -> Option<CommandFn> {
        self.bindings.get(&key).map(|e| e.function)
    }

    /// Look up a command name for a key
    pub fn lookup_name(&self, key: Key) -> Option<&'static str> {
        self.bindings.get(&key).map(|e| e.name)
    }

    /// Get all bindings as (key, command_name) pairs, sorted by command
    pub fn all_bindings(&self) -> Vec<(Key, &'static str)> {
        let mut bindings: Vec<_> = self
            .bindings
            .iter()
            .map(|(&key, entry)| (key, entry.name))
            .collect();
        bindings.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.display_name().cmp(&b.0.display_name())));
        bindings
    }

    /// Set up default key bindings
    fn setup_defaults(&mut self) {
        use editing::*;
        use files::*;
        use misc::*;
        use navigation::*;
        use run::*;

        // Cursor movement
        self.bind_named(Key::RIGHT, forward_char, "forward-char");
        self.bind_named(Key::LEFT, backward_char, "backward-char");
        self.bind_named(Key::DOWN, next_line, "next-line");
        self.bind_named(Key::UP, previous_line, "previous-line");
        self.bind_named(Key::HOME, beginning_of_line, "beginning-of-line");
        self.bind_named(Key::ctrl('a'), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::END, end_of_line, "end-of-line");
        self.bind_named(Key::ctrl('e'), end_of_line, "end-of-line");
        self.bind_named(Key::PAGE_DOWN, scroll_down, "scroll-down");
        self.bind_named(Key::PAGE_UP, scroll_up, "scroll-up");
        self.bind_named(Key::meta('<'), beginning_of_buffer, "beginning-of-buffer");
        self.bind_named(Key::meta('>'), end_of_buffer, "end-of-buffer");

        // Editing
        self.bind_named(Key::ENTER, newline, "newline");
        self.bind_named(Key::TAB, insert_tab, "tab-to-tab-stop");
        self.bind_named(Key::BACKSPACE, delete_char_backward, "delete-backward-char");
        self.bind_named(Key::ctrl('h'), delete_char_backward, "delete-backward-char");
        self.bind_named(Key::DELETE, delete_char_forward, "delete-char");
        self.bind_named(Key::ctrl('d'), delete_char_forward, "delete-char");

        // Files
        self.bind_named(Key::ctrl('s'), save_buffer, "save-buffer");
        self.bind_named(Key::ctrl('w'), write_file, "write-file");
        self.bind_named(Key::ctrl('o'), find_file, "find-file");

        // Running
        self.bind_named(Key::function(5), run_file, "run-file");
        self.bind_named(Key::ctrl('r'), run_file, "run-file");
        self.bind_named(Key::ctrl('l'), clear_console, "clear-console");

        // Display
        self.bind_named(Key::meta('l'), toggle_line_numbers, "toggle-line-numbers");
        self.bind_named(Key::meta('s'), toggle_syntax_highlighting, "toggle-syntax-highlighting");
        self.bind_named(Key::function(1), describe_bindings, "describe-bindings");

        self.bind_named(Key::ctrl('g'), abort, "keyboard-quit");
        self.bind_named(Key::ctrl('q'), quit, "quit");
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let table = KeyTable::with_defaults();
        assert_eq!(table.lookup_name(Key::function(5)), Some("run-file"));
        assert_eq!(table.lookup_name(Key::ctrl('r')), Some("run-file"));
        assert_eq!(table.lookup_name(Key::ctrl('s')), Some("save-buffer"));
        assert_eq!(table.lookup_name(Key::ctrl('q')), Some("quit"));
        assert!(table.lookup(Key::ctrl('z')).is_none());
    }

    #[test]
    fn test_all_bindings_sorted_by_name() {
        let table = KeyTable::with_defaults();
        let bindings = table.all_bindings();
        assert!(bindings.windows(2).all(|w| w[0].1 <= w[1].1));
        let run_keys: Vec<String> = bindings
            .iter()
            .filter(|(_, name)| *name == "run-file")
            .map(|(key, _)| key.display_name())
            .collect();
        assert_eq!(run_keys, vec!["C-r", "F5"]);
    }
}
