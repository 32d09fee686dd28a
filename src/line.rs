//! Line representation and text operations

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A single line of text in a buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// The text content (without trailing newline)
    text: String,
}

impl Line {
    /// Create a new empty line
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Insert a character at byte position
    pub fn insert_char(&mut self, byte_pos: usize, ch: char) {
        self.text.insert(byte_pos, ch);
    }

    /// Insert a string at byte position
    pub fn insert_str(&mut self, byte_pos: usize, s: &str) {
        self.text.insert_str(byte_pos, s);
    }

    /// Delete a range of bytes and return the deleted text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        self.text.drain(start..end).collect()
    }

    /// Split the line at byte position, returning the remainder
    pub fn split_off(&mut self, byte_pos: usize) -> Line {
        Line::from(self.text.split_off(byte_pos))
    }

    /// Append another line's content to this line
    pub fn append(&mut self, other: Line) {
        self.text.push_str(&other.text);
    }

    /// Byte position of the char before `byte_pos`
    pub fn prev_boundary(&self, byte_pos: usize) -> Option<usize> {
        self.text
            .get(..byte_pos)?
            .char_indices()
            .next_back()
            .map(|(pos, _)| pos)
    }

    /// Byte position just past the char at `byte_pos`
    pub fn next_boundary(&self, byte_pos: usize) -> Option<usize> {
        let ch = self.text.get(byte_pos..)?.chars().next()?;
        Some(byte_pos + ch.len_utf8())
    }

    /// Display column of `byte_pos`, expanding tabs to `tab_width`
    pub fn byte_to_col(&self, byte_pos: usize, tab_width: usize) -> usize {
        let end = byte_pos.min(self.text.len());
        let prefix = self.text.get(..end).unwrap_or(&self.text);
        if !prefix.contains('\t') {
            return prefix.width();
        }
        prefix
            .chars()
            .fold(0, |col, ch| col + char_width(ch, col, tab_width))
    }

    /// Byte position of the char covering display column `col`
    ///
    /// Columns past the end of the line map to the line length.
    pub fn col_to_byte(&self, col: usize, tab_width: usize) -> usize {
        let mut current = 0;
        for (byte_idx, ch) in self.text.char_indices() {
            let width = char_width(ch, current, tab_width);
            if current + width > col {
                return byte_idx;
            }
            current += width;
        }
        self.text.len()
    }
}

/// Width of `ch` when drawn at column `col`
pub fn char_width(ch: char, col: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - col % tab_width
    } else {
        ch.width().unwrap_or(0)
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self {
            text: s.to_string(),
        }
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Self { text }
    }
}
