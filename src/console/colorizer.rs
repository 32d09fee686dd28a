//! Whole-chunk console colorizer
//!
//! Interpreter output is not tokenized. Each inserted chunk is painted
//! uniformly according to the mode set just before it was inserted.

use crate::syntax::{Color, PaintTarget, Span, Style};

/// Coloring mode for the next inserted chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightState {
    /// Normal output, inherits the console's text color
    #[default]
    Default,
    /// Standard error
    Error,
    /// Run start/finish banners
    BeginOrEnd,
}

/// Three-state painter for console chunks
///
/// Transitions only happen through [`TerminalColorizer::set_state`]; the
/// colorizer never resets itself after rendering.
#[derive(Debug, Clone)]
pub struct TerminalColorizer {
    state: HighlightState,
    error_style: Style,
    banner_style: Style,
}

impl TerminalColorizer {
    pub fn new() -> Self {
        Self {
            state: HighlightState::Default,
            error_style: Style::fg(Color::Red).with_bold(),
            banner_style: Style::fg(Color::Blue),
        }
    }

    pub fn set_state(&mut self, state: HighlightState) {
        self.state = state;
    }

    #[cfg(test)]
    pub fn state(&self) -> HighlightState {
        self.state
    }

    /// Style for the current mode (None = leave unstyled)
    pub fn style(&self) -> Option<Style> {
        match self.state {
            HighlightState::Default => None,
            HighlightState::Error => Some(self.error_style),
            HighlightState::BeginOrEnd => Some(self.banner_style),
        }
    }

    /// Paint command covering the whole chunk
    pub fn render(&self, chunk: &str) -> Option<Span> {
        if chunk.is_empty() {
            return None;
        }
        self.style().map(|style| Span::new(0, chunk.len(), style))
    }

    /// Paint the whole chunk onto a target that holds it starting at `offset`
    pub fn render_into<T: PaintTarget + ?Sized>(&self, chunk: &str, offset: usize, target: &mut T) {
        if let Some(span) = self.render(chunk) {
            target.set_format(offset + span.start, span.len(), span.style);
        }
    }
}

impl Default for TerminalColorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::StyledLine;

    #[test]
    fn test_default_state_paints_nothing() {
        let colorizer = TerminalColorizer::new();
        assert_eq!(colorizer.state(), HighlightState::Default);
        assert_eq!(colorizer.render("plain output"), None);
    }

    #[test]
    fn test_error_paints_whole_chunk() {
        let mut colorizer = TerminalColorizer::new();
        colorizer.set_state(HighlightState::Error);

        let span = colorizer.render("boom").unwrap();
        assert_eq!((span.start, span.end), (0, 4));
        assert!(span.style.bold);
        assert_eq!(span.style.fg, Color::Red);
    }

    #[test]
    fn test_state_is_sticky_until_set() {
        let mut colorizer = TerminalColorizer::new();
        colorizer.set_state(HighlightState::Error);
        let first = colorizer.render("boom").unwrap();

        // No intervening set_state: the last mode still applies
        let second = colorizer.render("next").unwrap();
        assert_eq!(first.style, second.style);
        assert_eq!(colorizer.state(), HighlightState::Error);

        colorizer.set_state(HighlightState::Default);
        assert_eq!(colorizer.render("next"), None);
    }

    #[test]
    fn test_banner_style() {
        let mut colorizer = TerminalColorizer::new();
        colorizer.set_state(HighlightState::BeginOrEnd);
        let mut line = StyledLine::new("> Running x");
        colorizer.render_into("Running x", 2, &mut line);

        let runs = line.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!((runs[0].start, runs[0].end), (2, 11));
        assert_eq!(runs[0].style.fg, Color::Blue);
        assert!(!runs[0].style.bold);
    }

    #[test]
    fn test_empty_chunk() {
        let mut colorizer = TerminalColorizer::new();
        colorizer.set_state(HighlightState::Error);
        assert_eq!(colorizer.render(""), None);
    }
}
