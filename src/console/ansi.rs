//! ANSI output for headless use
//!
//! Writes console chunks and highlighted lines straight to a stream
//! (usually stdout) with SGR escape sequences instead of a screen buffer.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};

use super::{ChunkSink, HighlightState, TerminalColorizer};
use crate::syntax::{Style, StyledLine};
use crate::terminal::queue_style;

/// Styled writer over any `Write`
pub struct AnsiWriter<W: Write> {
    out: W,
    colorizer: TerminalColorizer,
    /// First write error, reported by `finish`
    error: Option<io::Error>,
}

impl<W: Write> AnsiWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            colorizer: TerminalColorizer::new(),
            error: None,
        }
    }

    fn write_segment(&mut self, text: &str, style: &Style) -> io::Result<()> {
        if style.is_default() {
            queue!(self.out, Print(text))?;
        } else {
            queue_style(&mut self.out, style)?;
            queue!(self.out, Print(text), SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    /// Write one highlighted line followed by a newline
    pub fn write_line(&mut self, line: &StyledLine) -> io::Result<()> {
        for (text, style) in line.segments() {
            self.write_segment(text, &style)?;
        }
        queue!(self.out, Print("\n"))?;
        Ok(())
    }

    fn write_chunk(&mut self, chunk: &str) -> io::Result<()> {
        match self.colorizer.style() {
            Some(style) => {
                // Keep newlines outside the styled run so colors never bleed
                for (i, piece) in chunk.split('\n').enumerate() {
                    if i > 0 {
                        queue!(self.out, Print("\n"))?;
                    }
                    if !piece.is_empty() {
                        self.write_segment(piece, &style)?;
                    }
                }
            }
            None => queue!(self.out, Print(chunk))?,
        }
        self.out.flush()
    }

    /// Flush and hand back the stream, or the first error seen
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> ChunkSink for AnsiWriter<W> {
    fn append(&mut self, chunk: &str, state: HighlightState) {
        self.colorizer.set_state(state);
        if self.error.is_none() {
            if let Err(err) = self.write_chunk(chunk) {
                self.error = Some(err);
            }
        }
        self.colorizer.set_state(HighlightState::Default);
    }
}
