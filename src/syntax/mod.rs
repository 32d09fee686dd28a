//! Syntax and styling module
//!
//! This module provides text styling infrastructure used for:
//! - Syntax highlighting of the edited file (regex rule tables)
//! - Console output coloring
//! - Editor chrome (mode line, minibuffer)

mod builtin;
mod highlighter;
mod language;
mod manager;
mod rules;
mod style;
mod theme;
mod tokens;

pub use builtin::all_languages;
pub use language::{split_command, ExtraPattern, LanguageSpec};
pub use manager::{HighlightCache, SyntaxManager};
pub use style::{Color, PaintTarget, Span, Style, StyledLine};
pub use theme::Theme;
pub use tokens::TokenType;
