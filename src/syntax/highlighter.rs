//! Block highlighter
//!
//! Paints one line at a time with every rule of a table. Rules run in
//! priority order and later paints overwrite earlier ones, so the result
//! depends only on the line and the table.

use super::rules::{HighlightResult, LineState, RuleTable};
use super::style::{PaintTarget, Span, StyledLine};

impl RuleTable {
    /// Apply every rule to `line`, sending paint commands to `target`.
    ///
    /// After each match the scan resumes at the match end; an empty match
    /// moves the scan one character forward instead.
    pub fn highlight_into<T: PaintTarget + ?Sized>(&self, line: &str, target: &mut T) -> LineState {
        for rule in self.rules() {
            let mut pos = 0;
            while let Some(((start, end), _)) = rule.find_at(line, pos) {
                if end > start {
                    target.set_format(start, end - start, rule.style);
                    pos = end;
                } else {
                    pos = next_char_boundary(line, start);
                }
                if pos > line.len() {
                    break;
                }
            }
        }
        LineState::Clean
    }

    /// Highlight a single line, returning the paint commands in order
    pub fn highlight_line(&self, line: &str) -> HighlightResult {
        let mut spans: Vec<Span> = Vec::new();
        let end_state = self.highlight_into(line, &mut spans);
        HighlightResult { spans, end_state }
    }

    /// Highlight a single line into resolved, non-overlapping styling
    pub fn styled_line(&self, line: &str) -> StyledLine {
        let HighlightResult { spans, end_state } = self.highlight_line(line);
        debug_assert_eq!(end_state, LineState::Clean);

        let mut styled = StyledLine::new(line);
        for span in spans {
            styled.set_format(span.start, span.len(), span.style);
        }
        styled
    }
}

/// Byte offset of the character after `pos` (or one past the end)
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len() + 1, |ch| pos + ch.len_utf8())
}
