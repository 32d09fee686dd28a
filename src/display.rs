//! Display rendering
//!
//! Screen layout from top to bottom: editor pane, mode line, console pane,
//! exit-code line, minibuffer.

use crate::buffer::Buffer;
use crate::console::Console;
use crate::error::Result;
use crate::line::char_width;
use crate::run::RunRecord;
use crate::syntax::{HighlightCache, Style, StyledLine, SyntaxManager};
use crate::terminal::Terminal;
use crate::window::Window;

/// Tab width used for process output
const CONSOLE_TAB_WIDTH: usize = 8;

/// Screen rows assigned to each pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub editor_rows: u16,
    pub mode_row: u16,
    pub console_top: u16,
    pub console_rows: u16,
    pub exit_row: u16,
    pub minibuffer_row: u16,
}

impl Layout {
    /// Split `rows` between the panes, shrinking the console on small screens
    pub fn new(rows: u16, console_height: u16) -> Self {
        // Mode line, exit-code line and minibuffer take one row each
        let available = rows.saturating_sub(3).max(1);
        let console_rows = console_height.min(available.saturating_sub(1));
        let editor_rows = (available - console_rows).max(1);
        let mode_row = editor_rows;
        let console_top = mode_row + 1;
        let exit_row = console_top + console_rows;
        Self {
            editor_rows,
            mode_row,
            console_top,
            console_rows,
            exit_row,
            minibuffer_row: exit_row + 1,
        }
    }
}

/// Everything one frame shows
pub struct Frame<'a> {
    pub buffer: &'a Buffer,
    pub window: &'a Window,
    pub syntax: &'a SyntaxManager,
    pub cache: &'a mut HighlightCache,
    pub console: &'a Console,
    pub exit_label: String,
    /// Most recent run, shown on the mode line while active
    pub run: Option<&'a RunRecord>,
    /// Put the cursor in the minibuffer instead of the editor pane
    pub prompt_active: bool,
}

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in minibuffer (bottom line)
    message: Option<String>,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    tab_width: usize,
    console_height: u16,
}

impl Display {
    pub fn new(show_line_numbers: bool, tab_width: usize, console_height: u16) -> Self {
        Self {
            needs_redraw: true,
            message: None,
            show_line_numbers,
            tab_width,
            console_height,
        }
    }

    /// Toggle line numbers on/off
    pub fn toggle_line_numbers(&mut self) {
        self.show_line_numbers = !self.show_line_numbers;
        self.needs_redraw = true;
    }

    /// Layout for a terminal of `rows` rows
    pub fn layout(&self, rows: u16) -> Layout {
        Layout::new(rows, self.console_height)
    }

    /// Calculate width needed for line numbers (including separator)
    fn line_number_width(&self, line_count: usize) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        let digits = line_count.max(1).to_string().len();
        digits.max(3) + 1 // minimum 3 digits + space
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Set a message to display
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Current minibuffer message
    #[cfg(test)]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Render the editor display
    pub fn render(&mut self, terminal: &mut Terminal, frame: Frame<'_>) -> Result<()> {
        let Frame {
            buffer,
            window,
            syntax,
            cache,
            console,
            exit_label,
            run,
            prompt_active,
        } = frame;
        let cols = terminal.cols() as usize;
        let layout = self.layout(terminal.rows());

        if self.needs_redraw {
            terminal.clear_screen()?;
        }
        terminal.set_cursor_visible(false)?;

        self.render_editor(terminal, &layout, cols, buffer, window, syntax, cache)?;
        let language = cache.language.as_deref();
        self.render_mode_line(terminal, layout.mode_row, cols, buffer, window, language, run)?;
        self.render_console(terminal, &layout, cols, console)?;

        terminal.move_cursor(layout.exit_row, 0)?;
        terminal.write_str(&truncate_to_width(&exit_label, cols))?;
        terminal.clear_to_eol()?;

        self.render_minibuffer(terminal, layout.minibuffer_row, cols)?;

        if prompt_active {
            let col = self.message.as_deref().map(display_width).unwrap_or(0);
            terminal.move_cursor(layout.minibuffer_row, col.min(cols.saturating_sub(1)) as u16)?;
        } else {
            self.position_cursor(terminal, window, buffer)?;
        }

        terminal.set_cursor_visible(true)?;
        terminal.flush()?;

        self.needs_redraw = false;
        Ok(())
    }

    /// Render the editor pane
    #[allow(clippy::too_many_arguments)]
    fn render_editor(
        &self,
        terminal: &mut Terminal,
        layout: &Layout,
        cols: usize,
        buffer: &Buffer,
        window: &Window,
        syntax: &SyntaxManager,
        cache: &mut HighlightCache,
    ) -> Result<()> {
        let top_line = window.top_line();
        let line_count = buffer.line_count();
        let lnum_width = self.line_number_width(line_count);
        let text_cols = cols.saturating_sub(lnum_width);

        for row in 0..layout.editor_rows {
            let line_idx = top_line + row as usize;
            terminal.move_cursor(row, 0)?;

            if let Some(line) = buffer.line(line_idx) {
                if self.show_line_numbers {
                    let lnum_str = format!("{:>width$} ", line_idx + 1, width = lnum_width - 1);
                    terminal.set_dim(true)?;
                    terminal.write_str(&lnum_str)?;
                    terminal.set_dim(false)?;
                }

                let styled = syntax.highlight_line(cache, line_idx, line.text(), line_count);
                for (text, style) in clip_segments(&styled, text_cols, self.tab_width) {
                    terminal.write_styled(&text, &style)?;
                }
            } else {
                // Empty line indicator (like vim's ~)
                if self.show_line_numbers {
                    terminal.write_str(&" ".repeat(lnum_width))?;
                }
                terminal.set_dim(true)?;
                terminal.write_str("~")?;
                terminal.set_dim(false)?;
            }

            terminal.clear_to_eol()?;
        }
        Ok(())
    }

    /// Render the mode line
    #[allow(clippy::too_many_arguments)]
    fn render_mode_line(
        &self,
        terminal: &mut Terminal,
        row: u16,
        cols: usize,
        buffer: &Buffer,
        window: &Window,
        language: Option<&str>,
        run: Option<&RunRecord>,
    ) -> Result<()> {
        let modified = if buffer.is_modified() { "**" } else { "--" };
        let filename = buffer
            .filename()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no file".to_string());
        let language = language.unwrap_or("Text");
        let state = run_state(run);

        let mode_line = format!(
            "{}- swifty: {} ({}) [{}] L{} {} ",
            modified,
            buffer.name(),
            filename,
            language,
            window.cursor_line() + 1,
            state,
        );

        let width = display_width(&mode_line);
        let padded = if width < cols {
            format!("{}{}", mode_line, "-".repeat(cols - width))
        } else {
            truncate_to_width(&mode_line, cols)
        };

        terminal.move_cursor(row, 0)?;
        terminal.write_styled(&padded, &Style::reverse())?;
        Ok(())
    }

    /// Render the last lines of the console
    fn render_console(
        &self,
        terminal: &mut Terminal,
        layout: &Layout,
        cols: usize,
        console: &Console,
    ) -> Result<()> {
        let lines = console.tail(layout.console_rows as usize);
        for row in 0..layout.console_rows {
            terminal.move_cursor(layout.console_top + row, 0)?;
            if let Some(line) = lines.get(row as usize) {
                for (text, style) in clip_segments(line, cols, CONSOLE_TAB_WIDTH) {
                    terminal.write_styled(&text, &style)?;
                }
            }
            terminal.clear_to_eol()?;
        }
        Ok(())
    }

    /// Render the minibuffer (message area)
    fn render_minibuffer(&self, terminal: &mut Terminal, row: u16, cols: usize) -> Result<()> {
        terminal.move_cursor(row, 0)?;

        if let Some(ref msg) = self.message {
            terminal.write_str(&truncate_to_width(msg, cols))?;
        }

        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Position the hardware cursor at the correct location
    fn position_cursor(&self, terminal: &mut Terminal, window: &Window, buffer: &Buffer) -> Result<()> {
        let cursor_line = window.cursor_line();
        let display_col = buffer
            .line(cursor_line)
            .map(|line| line.byte_to_col(window.cursor_col(), self.tab_width))
            .unwrap_or(0);

        let lnum_width = self.line_number_width(buffer.line_count());
        let screen_row = cursor_line.saturating_sub(window.top_line()) as u16;
        let max_col = (terminal.cols() as usize).saturating_sub(1);
        let screen_col = (lnum_width + display_col).min(max_col) as u16;

        terminal.move_cursor(screen_row, screen_col)?;
        Ok(())
    }
}

/// Cut a styled line into printable segments no wider than `max_cols`,
/// expanding tabs
pub fn clip_segments(line: &StyledLine, max_cols: usize, tab_width: usize) -> Vec<(String, Style)> {
    let mut out = Vec::new();
    let mut col = 0;

    'segments: for (text, style) in line.segments() {
        let mut piece = String::new();
        for ch in text.chars() {
            let width = char_width(ch, col, tab_width);
            if col + width > max_cols {
                if !piece.is_empty() {
                    out.push((piece, style));
                }
                break 'segments;
            }
            if ch == '\t' {
                piece.extend(std::iter::repeat(' ').take(width));
            } else if !ch.is_control() {
                piece.push(ch);
            }
            col += width;
        }
        if !piece.is_empty() {
            out.push((piece, style));
        }
    }
    out
}

/// Mode line run label: the file being run, or idle
fn run_state(run: Option<&RunRecord>) -> String {
    match run {
        Some(record) if record.is_running() => {
            let name = record
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| record.command_line());
            format!("Running {}", name)
        }
        _ => "Idle".to_string(),
    }
}

fn display_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Color, PaintTarget};

    #[test]
    fn test_layout() {
        let layout = Layout::new(30, 10);
        assert_eq!(layout.editor_rows, 17);
        assert_eq!(layout.mode_row, 17);
        assert_eq!(layout.console_top, 18);
        assert_eq!(layout.console_rows, 10);
        assert_eq!(layout.exit_row, 28);
        assert_eq!(layout.minibuffer_row, 29);
    }

    #[test]
    fn test_layout_small_screen() {
        let layout = Layout::new(5, 10);
        assert_eq!(layout.editor_rows, 1);
        assert_eq!(layout.console_rows, 1);
        assert_eq!(layout.minibuffer_row, 4);
    }

    #[test]
    fn test_clip_segments() {
        let mut line = StyledLine::new("let\tx = 1");
        line.set_format(0, 3, Style::fg(Color::Blue));

        let segments = clip_segments(&line, 80, 4);
        assert_eq!(segments[0], ("let".to_string(), Style::fg(Color::Blue)));
        assert_eq!(segments[1].0, " x = 1");

        let clipped = clip_segments(&line, 4, 4);
        let text: String = clipped.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(text, "let ");
    }

    #[test]
    fn test_line_number_width() {
        let mut display = Display::new(false, 4, 10);
        assert_eq!(display.line_number_width(50), 0);
        display.toggle_line_numbers();
        assert_eq!(display.line_number_width(50), 4);
        assert_eq!(display.line_number_width(12345), 6);
    }

    #[test]
    fn test_run_state() {
        let mut record = RunRecord {
            command: vec!["scala".to_string(), "/tmp/Main.scala".to_string()],
            path: "/tmp/Main.scala".into(),
            pid: 42,
            exit_code: None,
        };
        assert_eq!(run_state(None), "Idle");
        assert_eq!(run_state(Some(&record)), "Running Main.scala");

        record.exit_code = Some(0);
        assert_eq!(run_state(Some(&record)), "Idle");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("你好世界", 5), "你好");
        assert_eq!(truncate_to_width("abc", 10), "abc");
    }
}
