//! Run console
//!
//! A read-only, append-only list of styled lines fed with interpreter
//! output. Every chunk is colored as a whole by the [`TerminalColorizer`].

mod ansi;
mod colorizer;
mod decode;

use std::collections::VecDeque;

use crate::syntax::StyledLine;

pub use ansi::AnsiWriter;
pub use colorizer::{HighlightState, TerminalColorizer};
pub use decode::Utf8Decoder;

/// Default number of lines kept in the console
pub const DEFAULT_SCROLLBACK: usize = 1000;

/// Where run output goes
pub trait ChunkSink {
    /// Append `chunk` colored as a whole with `state`
    fn append(&mut self, chunk: &str, state: HighlightState);
}

/// Console output buffer
#[derive(Debug)]
pub struct Console {
    /// Finished lines plus the open last line
    lines: VecDeque<StyledLine>,
    /// Chunk painter
    colorizer: TerminalColorizer,
    /// Maximum lines kept
    scrollback: usize,
}

impl Console {
    pub fn new(scrollback: usize) -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(StyledLine::default());
        Self {
            lines,
            colorizer: TerminalColorizer::new(),
            scrollback: scrollback.max(1),
        }
    }

    /// Insert a chunk of output colored with `state`.
    ///
    /// The colorizer is returned to `Default` afterwards so the next,
    /// unrelated chunk is not mis-colored.
    pub fn append(&mut self, chunk: &str, state: HighlightState) {
        self.colorizer.set_state(state);

        let mut pieces = chunk.split('\n');
        if let Some(first) = pieces.next() {
            self.paint_onto_last(first);
        }
        for piece in pieces {
            self.lines.push_back(StyledLine::default());
            self.paint_onto_last(piece);
        }
        while self.lines.len() > self.scrollback {
            self.lines.pop_front();
        }

        self.colorizer.set_state(HighlightState::Default);
    }

    fn paint_onto_last(&mut self, piece: &str) {
        if piece.is_empty() {
            return;
        }
        let Some(line) = self.lines.back_mut() else {
            return;
        };
        let start = line.push_str(piece);
        self.colorizer.render_into(piece, start, line);
    }

    /// Remove all output
    pub fn clear(&mut self) {
        self.lines.clear();
        self.lines.push_back(StyledLine::default());
    }

    /// The last `count` lines worth showing (a trailing empty open line is skipped)
    pub fn tail(&self, count: usize) -> Vec<&StyledLine> {
        let mut end = self.lines.len();
        if end > 0 && self.lines[end - 1].is_empty() {
            end -= 1;
        }
        let start = end.saturating_sub(count);
        self.lines.range(start..end).collect()
    }

}

#[cfg(test)]
impl Console {
    /// Current colorizer mode (always `Default` between chunks)
    pub fn state(&self) -> HighlightState {
        self.colorizer.state()
    }

    /// Plain text of everything in the console
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(StyledLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ChunkSink for Console {
    fn append(&mut self, chunk: &str, state: HighlightState) {
        Console::append(self, chunk, state);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLLBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Color, Style};

    #[test]
    fn test_append_splits_lines() {
        let mut console = Console::default();
        console.append("one\ntw", HighlightState::Default);
        console.append("o\nthree\n", HighlightState::Default);

        assert_eq!(console.text(), "one\ntwo\nthree\n");
        let tail: Vec<&str> = console.tail(10).iter().map(|l| l.text()).collect();
        assert_eq!(tail, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_state_reset_after_each_chunk() {
        let mut console = Console::default();
        console.append("boom\n", HighlightState::Error);
        assert_eq!(console.state(), HighlightState::Default);

        console.append("next\n", console.state());
        let lines = console.tail(2);
        assert_eq!(lines[0].style_at(0), Style::fg(Color::Red).with_bold());
        assert_eq!(lines[1].style_at(0), Style::default());
    }

    #[test]
    fn test_mixed_line_keeps_both_styles() {
        let mut console = Console::default();
        console.append("out ", HighlightState::Default);
        console.append("err", HighlightState::Error);

        let line = console.tail(1)[0];
        assert_eq!(line.text(), "out err");
        assert_eq!(line.style_at(0), Style::default());
        assert!(line.style_at(4).bold);
    }

    #[test]
    fn test_scrollback_limit() {
        let mut console = Console::new(3);
        console.append("a\nb\nc\nd\ne", HighlightState::Default);
        assert_eq!(console.lines.len(), 3);
        assert_eq!(console.text(), "c\nd\ne");
    }

    #[test]
    fn test_clear() {
        let mut console = Console::default();
        console.append("x\n", HighlightState::BeginOrEnd);
        console.clear();
        assert_eq!(console.text(), "");
        assert!(console.tail(5).is_empty());
    }
}
