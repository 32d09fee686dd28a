//! Style types for text rendering
//!
//! This module provides the foundation for styled text rendering,
//! used for syntax highlighting, console output and editor chrome.

/// Terminal colors (ANSI 16-color palette plus true color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    /// 24-bit color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a color from a palette name ("red", "bright-blue") or a
    /// `#rrggbb` hex triple
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Color::Rgb(r, g, b));
        }

        let name = s.to_lowercase().replace(['_', ' '], "-");
        let color = match name.as_str() {
            "default" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "bright-black" | "gray" | "grey" => Color::BrightBlack,
            "bright-red" => Color::BrightRed,
            "bright-green" => Color::BrightGreen,
            "bright-yellow" => Color::BrightYellow,
            "bright-blue" => Color::BrightBlue,
            "bright-magenta" => Color::BrightMagenta,
            "bright-cyan" => Color::BrightCyan,
            "bright-white" => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Create a reverse video style (for the mode line)
    pub fn reverse() -> Self {
        Self {
            reverse: true,
            ..Default::default()
        }
    }

    /// Builder: set foreground color
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A styled span of text within a line (a paint command)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// Style to apply to this span
    pub style: Style,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    /// Get the length of this span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Anything a highlighter can paint onto.
///
/// Later calls overwrite earlier ones on overlapping ranges.
pub trait PaintTarget {
    fn set_format(&mut self, start: usize, len: usize, style: Style);
}

impl PaintTarget for Vec<Span> {
    fn set_format(&mut self, start: usize, len: usize, style: Style) {
        self.push(Span::new(start, start + len, style));
    }
}

/// A line of text with its resolved styling.
///
/// Keeps one style per byte so overlapping paints resolve to whichever
/// came last, then flattens back into non-overlapping runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    text: String,
    styles: Vec<Style>,
}

impl StyledLine {
    /// Create an unstyled line
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let styles = vec![Style::default(); text.len()];
        Self { text, styles }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append unstyled text, returning the byte offset it starts at
    pub fn push_str(&mut self, s: &str) -> usize {
        let start = self.text.len();
        self.text.push_str(s);
        self.styles.resize(self.text.len(), Style::default());
        start
    }

    /// Style at a byte position
    pub fn style_at(&self, pos: usize) -> Style {
        self.styles.get(pos).copied().unwrap_or_default()
    }

    /// Split the text into consecutive (text, style) segments covering the whole line
    pub fn segments(&self) -> Vec<(&str, Style)> {
        let mut segments = Vec::new();
        let mut seg_start = 0;
        for (pos, _) in self.text.char_indices().skip(1) {
            let style = self.style_at(seg_start);
            if self.style_at(pos) != style {
                segments.push((&self.text[seg_start..pos], style));
                seg_start = pos;
            }
        }
        if seg_start < self.text.len() {
            segments.push((&self.text[seg_start..], self.style_at(seg_start)));
        }
        segments
    }
}

#[cfg(test)]
impl StyledLine {
    /// Flatten into maximal runs of equal style, skipping unstyled text
    pub fn runs(&self) -> Vec<Span> {
        let mut runs: Vec<Span> = Vec::new();
        for (pos, style) in self.styles.iter().enumerate() {
            if style.is_default() {
                continue;
            }
            match runs.last_mut() {
                Some(run) if run.end == pos && run.style == *style => run.end = pos + 1,
                _ => runs.push(Span::new(pos, pos + 1, *style)),
            }
        }
        runs
    }
}

impl PaintTarget for StyledLine {
    fn set_format(&mut self, start: usize, len: usize, style: Style) {
        let end = (start + len).min(self.styles.len());
        if start >= end {
            return;
        }
        for slot in &mut self.styles[start..end] {
            *slot = style;
        }
    }
}
