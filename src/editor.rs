//! Editor state and main loop

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::buffer::Buffer;
use crate::command::{CommandStatus, KeyTable};
use crate::config::Config;
use crate::console::{Console, HighlightState};
use crate::display::{Display, Frame};
use crate::error::{EditorError, Result};
use crate::input::{translate_key, Key};
use crate::line::Line;
use crate::run::{RunCoordinator, RunPanel};
use crate::syntax::{HighlightCache, SyntaxManager};
use crate::terminal::Terminal;
use crate::window::Window;

/// How long the main loop waits for a key before draining run output
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Editor state
pub struct Editor {
    /// The open file
    pub buffer: Buffer,
    /// Viewport and cursor of the editor pane
    pub window: Window,
    /// Display state
    pub display: Display,
    /// Key bindings
    pub keytab: KeyTable,
    /// Rule tables for every known language
    pub syntax: SyntaxManager,
    /// Highlighting of the open file, one entry per line
    pub cache: HighlightCache,
    /// Console pane fed by the run panel
    pub panel: RunPanel<Console>,
    /// The interpreter process, if any
    pub coordinator: RunCoordinator,
    pub config: Config,
    /// Minibuffer prompt state
    pub prompt: PromptState,
    /// Whether editor is running
    pub running: bool,
}

/// What action to perform when prompt completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    None,
    FindFile,
    WriteFile,
    /// y/n answer to quitting with unsaved changes
    ConfirmQuit,
}

/// Minibuffer prompt state
#[derive(Debug, Clone)]
pub struct PromptState {
    /// Whether prompt is active
    pub active: bool,
    /// The prompt string (e.g., "Find file")
    pub prompt: String,
    /// Current input
    pub input: String,
    /// What to do when complete
    pub action: PromptAction,
    /// Default value (shown in prompt)
    pub default: Option<String>,
}

impl Default for PromptState {
    fn default() -> Self {
        Self {
            active: false,
            prompt: String::new(),
            input: String::new(),
            action: PromptAction::None,
            default: None,
        }
    }
}

impl Editor {
    /// Create an editor with an unnamed buffer for a terminal of `rows` rows
    pub fn new(config: Config, rows: u16) -> Result<Self> {
        let syntax = SyntaxManager::new(config.language_specs()?, &config.theme()?)?;
        let display = Display::new(config.show_line_numbers, config.tab_width, config.console_height);
        let window = Window::new(display.layout(rows).editor_rows);

        Ok(Self {
            buffer: Buffer::new(),
            window,
            display,
            keytab: KeyTable::with_defaults(),
            syntax,
            cache: HighlightCache::new(),
            panel: RunPanel::new(Console::new(config.console_scrollback)),
            coordinator: RunCoordinator::new(),
            config,
            prompt: PromptState::default(),
            running: true,
        })
    }

    /// Path of the open file, read when a run is triggered
    pub fn current_path(&self) -> Option<&Path> {
        self.buffer.filename()
    }

    /// Open a file, or start a new buffer for it if it does not exist
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        if path.exists() {
            self.buffer = Buffer::from_file(path)?;
            self.display.set_message(format!("Opened {}", path.display()));
        } else {
            let mut buffer = Buffer::new();
            buffer.set_filename(path.to_path_buf());
            self.buffer = buffer;
            self.display.set_message(format!("(New file) {}", path.display()));
        }
        self.window.reset();
        self.refresh_language();
        self.display.force_redraw();
        Ok(())
    }

    /// Re-detect the language after the file name changed
    fn refresh_language(&mut self) {
        let language = self
            .current_path()
            .and_then(|path| self.syntax.detect_language(path))
            .map(str::to_string);
        debug!(language = ?language, "language detected");
        self.cache.set_language(language);
    }

    /// Save the buffer to its file
    pub fn save(&mut self) -> Result<()> {
        self.buffer.save()?;
        let path = self.current_path().map(|p| p.display().to_string()).unwrap_or_default();
        self.display
            .set_message(format!("Wrote {} lines to {}", self.buffer.line_count(), path));
        Ok(())
    }

    /// Save the buffer under a new name
    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        self.buffer.save_as(path)?;
        self.refresh_language();
        let path = self.current_path().map(|p| p.display().to_string()).unwrap_or_default();
        self.display
            .set_message(format!("Wrote {} lines to {}", self.buffer.line_count(), path));
        Ok(())
    }

    /// Interpreter command for a file: its language's, else the configured default
    pub fn interpreter_for(&self, path: &Path) -> Option<Vec<String>> {
        self.syntax
            .interpreter_for(path)
            .map(<[String]>::to_vec)
            .or_else(|| self.config.default_interpreter())
    }

    /// Run the open file.
    ///
    /// Unsaved changes are written first so the interpreter sees what is
    /// on screen. A file without a path is rejected before anything runs.
    pub fn run_current_file(&mut self) -> Result<()> {
        if self.coordinator.is_running() || !self.panel.is_run_enabled() {
            return Err(EditorError::RunInProgress);
        }
        let path = match self.current_path() {
            Some(path) => path.to_path_buf(),
            None => {
                self.display.set_message("Not a valid file.");
                return Ok(());
            }
        };
        if self.buffer.is_modified() {
            self.save()?;
        }
        let interpreter = self
            .interpreter_for(&path)
            .ok_or_else(|| EditorError::NoInterpreter(path.clone()))?;

        self.coordinator.start(&interpreter, &path)
    }

    /// Feed every pending run event to the run panel
    pub fn drain_run_events(&mut self) -> bool {
        let events = self.coordinator.poll();
        let any = !events.is_empty();
        for event in events {
            self.panel.handle(event);
        }
        any
    }

    /// Empty the console pane
    pub fn clear_console(&mut self) {
        self.panel.sink_mut().clear();
    }

    /// List key bindings in the console
    pub fn describe_bindings(&mut self) {
        let mut listing = String::from("Key bindings:\n");
        for (key, name) in self.keytab.all_bindings() {
            listing.push_str(&format!("  {:<12} {}\n", key.display_name(), name));
        }
        self.panel
            .sink_mut()
            .append(&listing, HighlightState::BeginOrEnd);
    }

    /// Quit, asking first when there are unsaved changes
    pub fn request_quit(&mut self) {
        if self.buffer.is_modified() {
            self.start_prompt(
                "Modified buffer exists; quit anyway? (y or n)",
                PromptAction::ConfirmQuit,
                None,
            );
        } else {
            self.running = false;
        }
    }

    /// Run the main editor loop
    pub fn run(&mut self, terminal: &mut Terminal) -> Result<()> {
        self.display.force_redraw();

        while self.running {
            self.drain_run_events();

            let editor_rows = self.display.layout(terminal.rows()).editor_rows;
            if editor_rows != self.window.height() {
                self.window.set_height(editor_rows);
                self.display.force_redraw();
            }

            let frame = Frame {
                buffer: &self.buffer,
                window: &self.window,
                syntax: &self.syntax,
                cache: &mut self.cache,
                console: self.panel.sink(),
                exit_label: self.panel.exit_code_label(),
                run: self.coordinator.record(),
                prompt_active: self.prompt.active,
            };
            self.display.render(terminal, frame)?;

            let Some(key_event) = terminal.poll_key(INPUT_POLL)? else {
                continue;
            };
            if let Some(key) = translate_key(key_event) {
                match self.handle_key(key)? {
                    CommandStatus::Success => {}
                    CommandStatus::Failure => terminal.beep()?,
                    CommandStatus::Abort => {
                        self.display.set_message("Quit");
                        terminal.beep()?;
                    }
                }
            }
        }

        if self.coordinator.is_running() {
            warn!("quitting with a run still in progress");
        }
        info!("editor closed");
        Ok(())
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: Key) -> Result<CommandStatus> {
        if self.prompt.active {
            return self.handle_prompt_key(key);
        }

        self.display.clear_message();

        if let Some(cmd) = self.keytab.lookup(key) {
            let status = cmd(self)?;
            if status != CommandStatus::Success {
                debug!(
                    key = %key.display_name(),
                    command = self.keytab.lookup_name(key),
                    ?status,
                    "command did not succeed"
                );
            }
            Ok(status)
        } else if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.insert_char(ch);
            }
            Ok(CommandStatus::Success)
        } else {
            self.display
                .set_message(format!("{} is not bound", key.display_name()));
            Ok(CommandStatus::Failure)
        }
    }

    fn cursor(&self) -> (usize, usize) {
        (self.window.cursor_line(), self.window.cursor_col())
    }

    fn current_line(&self) -> Option<&Line> {
        self.buffer.line(self.window.cursor_line())
    }

    /// Move the cursor and remember its display column for vertical motion
    fn set_cursor(&mut self, line: usize, col: usize) {
        self.window.set_cursor(line, col);
        let goal = self
            .buffer
            .line(line)
            .map(|l| l.byte_to_col(col, self.config.tab_width))
            .unwrap_or(0);
        self.window.set_goal_col(goal);
        self.window.ensure_cursor_visible();
    }

    /// Move vertically to `line`, keeping the goal column
    fn set_cursor_line(&mut self, line: usize) {
        let col = self
            .buffer
            .line(line)
            .map(|l| l.col_to_byte(self.window.goal_col(), self.config.tab_width))
            .unwrap_or(0);
        self.window.set_cursor(line, col);
        self.window.ensure_cursor_visible();
    }

    /// Insert a character at cursor
    pub fn insert_char(&mut self, ch: char) {
        let (line, col) = self.cursor();
        self.buffer.insert_char(line, col, ch);
        self.cache.invalidate_line(line);
        self.set_cursor(line, col + ch.len_utf8());
    }

    /// Insert spaces up to the next tab stop
    pub fn insert_tab(&mut self) {
        let (line, col) = self.cursor();
        let tab_width = self.config.tab_width.max(1);
        let display_col = self
            .current_line()
            .map(|l| l.byte_to_col(col, tab_width))
            .unwrap_or(0);
        let spaces = " ".repeat(tab_width - display_col % tab_width);
        self.buffer.insert_str(line, col, &spaces);
        self.cache.invalidate_line(line);
        self.set_cursor(line, col + spaces.len());
    }

    /// Split the line at the cursor
    pub fn insert_newline(&mut self) {
        let (line, col) = self.cursor();
        self.buffer.insert_newline(line, col);
        self.cache.invalidate_line(line);
        self.cache.insert_line(line + 1);
        self.set_cursor(line + 1, 0);
    }

    /// Backspace: delete before the cursor, joining with the previous line at column 0
    pub fn delete_backward(&mut self) -> bool {
        let (line, col) = self.cursor();
        if col > 0 {
            match self.buffer.delete_backward(line, col) {
                Some((_, new_col)) => {
                    self.cache.invalidate_line(line);
                    self.set_cursor(line, new_col);
                    true
                }
                None => false,
            }
        } else {
            match self.buffer.join_with_previous(line) {
                Some(join_col) => {
                    self.cache.remove_line(line);
                    self.cache.invalidate_line(line - 1);
                    self.set_cursor(line - 1, join_col);
                    true
                }
                None => false,
            }
        }
    }

    /// Delete under the cursor, joining with the next line at end of line
    pub fn delete_forward(&mut self) -> bool {
        let (line, col) = self.cursor();
        let at_eol = self.current_line().map_or(true, |l| col >= l.len());
        if at_eol {
            if self.buffer.join_line(line) {
                self.cache.remove_line(line + 1);
                self.cache.invalidate_line(line);
                return true;
            }
            return false;
        }
        if self.buffer.delete_char(line, col).is_some() {
            self.cache.invalidate_line(line);
            true
        } else {
            false
        }
    }

    /// Move cursor right
    pub fn move_cursor_right(&mut self) {
        let (line, col) = self.cursor();
        match self.current_line().and_then(|l| l.next_boundary(col)) {
            Some(next) => self.set_cursor(line, next),
            None if line + 1 < self.buffer.line_count() => self.set_cursor(line + 1, 0),
            None => {}
        }
    }

    /// Move cursor left
    pub fn move_cursor_left(&mut self) {
        let (line, col) = self.cursor();
        match self.current_line().and_then(|l| l.prev_boundary(col)) {
            Some(prev) => self.set_cursor(line, prev),
            None if line > 0 => {
                let prev_len = self.buffer.line(line - 1).map_or(0, Line::len);
                self.set_cursor(line - 1, prev_len);
            }
            None => {}
        }
    }

    /// Move cursor down
    pub fn move_cursor_down(&mut self) {
        let line = self.window.cursor_line();
        if line + 1 < self.buffer.line_count() {
            self.set_cursor_line(line + 1);
        }
    }

    /// Move cursor up
    pub fn move_cursor_up(&mut self) {
        let line = self.window.cursor_line();
        if line > 0 {
            self.set_cursor_line(line - 1);
        }
    }

    /// Move to beginning of line
    pub fn move_to_bol(&mut self) {
        let line = self.window.cursor_line();
        self.set_cursor(line, 0);
    }

    /// Move to end of line
    pub fn move_to_eol(&mut self) {
        let line = self.window.cursor_line();
        let len = self.current_line().map_or(0, Line::len);
        self.set_cursor(line, len);
    }

    /// Page down
    pub fn page_down(&mut self) {
        let page = (self.window.height() as usize).saturating_sub(2).max(1);
        let last = self.buffer.line_count().saturating_sub(1);
        let target = (self.window.cursor_line() + page).min(last);
        self.set_cursor_line(target);
    }

    /// Page up
    pub fn page_up(&mut self) {
        let page = (self.window.height() as usize).saturating_sub(2).max(1);
        let target = self.window.cursor_line().saturating_sub(page);
        self.set_cursor_line(target);
    }

    /// Move to beginning of buffer
    pub fn move_to_buffer_start(&mut self) {
        self.set_cursor(0, 0);
    }

    /// Move to end of buffer
    pub fn move_to_buffer_end(&mut self) {
        let last = self.buffer.line_count().saturating_sub(1);
        let len = self.buffer.line(last).map_or(0, Line::len);
        self.set_cursor(last, len);
    }

    /// Start a minibuffer prompt
    pub fn start_prompt(&mut self, prompt: &str, action: PromptAction, default: Option<String>) {
        self.prompt.active = true;
        self.prompt.prompt = prompt.to_string();
        self.prompt.input.clear();
        self.prompt.action = action;
        self.prompt.default = default;
        self.update_prompt_display();
    }

    /// Update the prompt display
    fn update_prompt_display(&mut self) {
        let display = match &self.prompt.default {
            Some(def) if self.prompt.input.is_empty() => {
                format!("{} (default {}): ", self.prompt.prompt, def)
            }
            _ => format!("{}: {}", self.prompt.prompt, self.prompt.input),
        };
        self.display.set_message(display);
    }

    fn cancel_prompt(&mut self) {
        self.prompt.active = false;
        self.prompt.action = PromptAction::None;
    }

    /// Handle key press during prompt mode
    fn handle_prompt_key(&mut self, key: Key) -> Result<CommandStatus> {
        if key == Key::ctrl('g') || key == Key::ESCAPE {
            self.cancel_prompt();
            return Ok(CommandStatus::Abort);
        }

        if self.prompt.action == PromptAction::ConfirmQuit {
            self.cancel_prompt();
            if matches!(key.base_char(), Some('y') | Some('Y')) {
                self.running = false;
            } else {
                self.display.clear_message();
            }
            return Ok(CommandStatus::Success);
        }

        // Enter completes
        if key == Key::ENTER {
            let input = if self.prompt.input.is_empty() {
                self.prompt.default.clone().unwrap_or_default()
            } else {
                self.prompt.input.clone()
            };
            let action = self.prompt.action;
            self.cancel_prompt();
            self.display.clear_message();
            return self.complete_prompt(action, input);
        }

        if key == Key::BACKSPACE || key == Key::ctrl('h') {
            self.prompt.input.pop();
            self.update_prompt_display();
            return Ok(CommandStatus::Success);
        }

        if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.prompt.input.push(ch);
                self.update_prompt_display();
            }
            return Ok(CommandStatus::Success);
        }

        Ok(CommandStatus::Failure)
    }

    /// Complete a prompt action
    fn complete_prompt(&mut self, action: PromptAction, input: String) -> Result<CommandStatus> {
        if input.is_empty() {
            self.display.set_message("No file name");
            return Ok(CommandStatus::Failure);
        }
        let path = PathBuf::from(input);
        let result = match action {
            PromptAction::FindFile => self.open_file(&path),
            PromptAction::WriteFile => self.save_as(path),
            PromptAction::ConfirmQuit | PromptAction::None => Ok(()),
        };
        match result {
            Ok(()) => Ok(CommandStatus::Success),
            Err(e) => {
                self.display.set_message(e.to_string());
                Ok(CommandStatus::Failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> Editor {
        Editor::new(Config::default(), 30).unwrap()
    }

    fn type_str(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            let key = if ch == '\n' { Key::ENTER } else { Key::char(ch) };
            editor.handle_key(key).unwrap();
        }
    }

    #[test]
    fn test_typing_and_editing() {
        let mut editor = editor();
        type_str(&mut editor, "let x\nprint(x)");
        assert_eq!(editor.buffer.content(), "let x\nprint(x)\n");
        assert_eq!(editor.cursor(), (1, 8));

        editor.handle_key(Key::HOME).unwrap();
        editor.handle_key(Key::BACKSPACE).unwrap();
        assert_eq!(editor.buffer.line(0).unwrap().text(), "let xprint(x)");
        assert_eq!(editor.cursor(), (0, 5));

        editor.handle_key(Key::ENTER).unwrap();
        editor.handle_key(Key::UP).unwrap();
        editor.handle_key(Key::END).unwrap();
        editor.handle_key(Key::DELETE).unwrap();
        assert_eq!(editor.buffer.line(0).unwrap().text(), "let xprint(x)");
    }

    #[test]
    fn test_tab_inserts_spaces() {
        let mut editor = editor();
        type_str(&mut editor, "ab");
        editor.handle_key(Key::TAB).unwrap();
        assert_eq!(editor.buffer.line(0).unwrap().text(), "ab  ");
        assert_eq!(editor.cursor(), (0, 4));
    }

    #[test]
    fn test_vertical_motion_keeps_goal_column() {
        let mut editor = editor();
        type_str(&mut editor, "abcdef\nx\nabcdef");
        editor.handle_key(Key::UP).unwrap();
        assert_eq!(editor.cursor(), (1, 1));
        editor.handle_key(Key::UP).unwrap();
        assert_eq!(editor.cursor(), (0, 6));
    }

    #[test]
    fn test_run_without_path() {
        let mut editor = editor();
        assert_eq!(editor.current_path(), None);
        editor.handle_key(Key::function(5)).unwrap();
        assert_eq!(editor.display.message(), Some("Not a valid file."));
        assert!(!editor.coordinator.is_running());
        assert!(editor.panel.is_run_enabled());
    }

    #[test]
    fn test_unbound_key() {
        let mut editor = editor();
        let status = editor.handle_key(Key::ctrl('z')).unwrap();
        assert_eq!(status, CommandStatus::Failure);
        assert_eq!(editor.display.message(), Some("C-z is not bound"));
    }

    #[test]
    fn test_open_detects_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.scala");
        std::fs::write(&path, "val x = 1\n").unwrap();

        let mut editor = editor();
        editor.open_file(&path).unwrap();
        assert_eq!(editor.current_path(), Some(path.as_path()));
        assert_eq!(editor.cache.language.as_deref(), Some("Scala"));

        editor.open_file(&dir.path().join("notes.txt")).unwrap();
        assert_eq!(editor.cache.language, None);
        assert_eq!(editor.buffer.line_count(), 1);
    }

    #[test]
    fn test_save_prompts_for_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.swift");

        let mut editor = editor();
        type_str(&mut editor, "print(1)");
        editor.handle_key(Key::ctrl('s')).unwrap();
        assert!(editor.prompt.active);
        assert_eq!(editor.prompt.action, PromptAction::WriteFile);

        type_str(&mut editor, &path.display().to_string());
        editor.handle_key(Key::ENTER).unwrap();
        assert!(!editor.prompt.active);
        assert_eq!(editor.current_path(), Some(path.as_path()));
        assert_eq!(editor.cache.language.as_deref(), Some("Swift"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "print(1)\n");
    }

    #[test]
    fn test_quit_confirms_when_modified() {
        let mut editor = editor();
        editor.handle_key(Key::ctrl('q')).unwrap();
        assert!(!editor.running);

        let mut editor = self::editor();
        type_str(&mut editor, "x");
        editor.handle_key(Key::ctrl('q')).unwrap();
        assert!(editor.running);
        assert_eq!(editor.prompt.action, PromptAction::ConfirmQuit);
        editor.handle_key(Key::char('n')).unwrap();
        assert!(editor.running);
        assert!(!editor.prompt.active);

        editor.handle_key(Key::ctrl('q')).unwrap();
        editor.handle_key(Key::char('y')).unwrap();
        assert!(!editor.running);
    }

    #[test]
    fn test_interpreter_lookup() {
        let editor = editor();
        assert_eq!(
            editor.interpreter_for(Path::new("a.swift")),
            Some(vec!["/usr/bin/env".to_string(), "swift".to_string()])
        );
        assert_eq!(editor.interpreter_for(Path::new("a.txt")), None);

        let config = Config {
            default_interpreter: Some("sh".to_string()),
            ..Config::default()
        };
        let editor = Editor::new(config, 30).unwrap();
        assert_eq!(editor.interpreter_for(Path::new("a.txt")), Some(vec!["sh".to_string()]));
    }

    #[test]
    fn test_run_without_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello\n").unwrap();

        let mut editor = editor();
        editor.open_file(&path).unwrap();
        let err = editor.run_current_file().unwrap_err();
        assert!(matches!(err, EditorError::NoInterpreter(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_file_end_to_end() {
        use std::time::Instant;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.sh");
        std::fs::write(&path, "echo out\necho err >&2\nexit 3\n").unwrap();

        let config = Config {
            default_interpreter: Some("sh".to_string()),
            ..Config::default()
        };
        let mut editor = Editor::new(config, 30).unwrap();
        editor.open_file(&path).unwrap();
        editor.run_current_file().unwrap();
        assert!(editor.coordinator.is_running());

        // A second trigger while the first run is active is refused
        assert!(matches!(
            editor.run_current_file(),
            Err(EditorError::RunInProgress)
        ));

        let deadline = Instant::now() + Duration::from_secs(10);
        while editor.panel.exit_code().is_none() && Instant::now() < deadline {
            editor.drain_run_events();
            std::thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(editor.panel.exit_code(), Some(3));
        assert_eq!(editor.panel.exit_code_label(), "Exit code: 3");
        assert!(editor.panel.is_run_enabled());
        assert!(!editor.coordinator.is_running());

        let text = editor.panel.sink().text();
        assert!(text.starts_with(&format!("Running sh {}", path.display())));
        assert!(text.contains("out\n"));
        assert!(text.contains("err\n"));
        assert!(text.contains("Process finished with exit code 3"));

        editor.handle_key(Key::ctrl('l')).unwrap();
        assert_eq!(editor.panel.sink().text(), "");
    }

    #[test]
    fn test_describe_bindings() {
        let mut editor = editor();
        editor.handle_key(Key::function(1)).unwrap();
        let text = editor.panel.sink().text();
        assert!(text.starts_with("Key bindings:"));
        assert!(text.contains("run-file"));
    }
}
