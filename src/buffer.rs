//! Buffer representation - the lines of the open file with its metadata

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{EditorError, Result};
use crate::line::Line;

/// A buffer containing text and metadata
#[derive(Debug)]
pub struct Buffer {
    /// Lines of text
    lines: Vec<Line>,
    /// Associated file path (None for unnamed buffers)
    filename: Option<PathBuf>,
    /// Whether buffer has unsaved changes
    modified: bool,
    /// Whether the file ended with a newline when loaded
    trailing_newline: bool,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()], // Always have at least one line
            filename: None,
            modified: false,
            trailing_newline: true,
        }
    }

    /// Create a buffer from text
    pub fn from_text(content: &str) -> Self {
        let mut lines: Vec<Line> = content.lines().map(Line::from).collect();
        if lines.is_empty() {
            lines.push(Line::new());
        }
        Self {
            lines,
            filename: None,
            modified: false,
            trailing_newline: content.is_empty() || content.ends_with('\n'),
        }
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut buffer = Self::from_text(&content);
        buffer.filename = Some(path.to_path_buf());
        info!(path = %path.display(), lines = buffer.line_count(), "opened file");
        Ok(buffer)
    }

    /// Buffer name shown in the mode line
    pub fn name(&self) -> String {
        self.filename
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "*scratch*".to_string())
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Set the filename
    pub fn set_filename(&mut self, path: PathBuf) {
        self.filename = Some(path);
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_char(byte_pos, ch);
            self.modified = true;
        }
    }

    /// Insert a string (without newlines) at position
    pub fn insert_str(&mut self, line_idx: usize, byte_pos: usize, s: &str) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_str(byte_pos, s);
            self.modified = true;
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            let new_line = line.split_off(byte_pos);
            self.lines.insert(line_idx + 1, new_line);
            self.modified = true;
        }
    }

    /// Delete a character at position, returns the deleted char
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> Option<char> {
        let line = self.lines.get_mut(line_idx)?;
        let ch = line.text().get(byte_pos..)?.chars().next()?;
        line.delete_range(byte_pos, byte_pos + ch.len_utf8());
        self.modified = true;
        Some(ch)
    }

    /// Delete backward (backspace), returns deleted char and new position
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> Option<(char, usize)> {
        let line = self.lines.get_mut(line_idx)?;
        let ch = line.text().get(..byte_pos)?.chars().last()?;
        let new_pos = byte_pos - ch.len_utf8();
        line.delete_range(new_pos, byte_pos);
        self.modified = true;
        Some((ch, new_pos))
    }

    /// Join line with the next line (delete newline at end of line)
    pub fn join_line(&mut self, line_idx: usize) -> bool {
        if line_idx + 1 < self.lines.len() {
            let next_line = self.lines.remove(line_idx + 1);
            if let Some(line) = self.lines.get_mut(line_idx) {
                line.append(next_line);
                self.modified = true;
                return true;
            }
        }
        false
    }

    /// Join with previous line (when backspacing at start of line)
    pub fn join_with_previous(&mut self, line_idx: usize) -> Option<usize> {
        if line_idx == 0 || line_idx >= self.lines.len() {
            return None;
        }
        let current_line = self.lines.remove(line_idx);
        let prev_line = self.lines.get_mut(line_idx - 1)?;
        let join_pos = prev_line.len();
        prev_line.append(current_line);
        self.modified = true;
        Some(join_pos)
    }

    /// Whole buffer as one string
    pub fn content(&self) -> String {
        let mut content = self
            .lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !content.is_empty() {
            content.push('\n');
        }
        content
    }

    /// Write buffer to its file
    pub fn save(&mut self) -> Result<()> {
        let path = self.filename.clone().ok_or(EditorError::NoFileName)?;
        self.write_to(&path)?;
        self.modified = false;
        Ok(())
    }

    /// Write buffer to a new path and adopt it as the filename
    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        self.write_to(&path)?;
        self.filename = Some(path);
        self.modified = false;
        Ok(())
    }

    /// Write buffer to specific path
    fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.content())?;
        info!(path = %path.display(), lines = self.line_count(), "wrote file");
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
