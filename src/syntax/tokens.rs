//! Token types for syntax highlighting
//!
//! This module defines the semantic token categories the rule tables
//! recognize, their paint priority and their default visual styles.

use super::style::{Color, Style};

/// Semantic token categories, declared in paint order.
///
/// Rules are applied lowest priority first, so on overlapping spans the
/// category declared later wins (a comment marker beats an operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    /// Reserved words (class, func, val, ...)
    Keyword,
    /// Type-like reserved words (self, nil, true, ...)
    TypeKeyword,
    /// Language-specific operators (=>, <-, :, ...)
    SpecialOperator,
    /// Comparison, arithmetic, bitwise and boolean operators
    Operator,
    /// Parens, brackets, braces
    Brace,
    /// Numeric literals (integers, hex, floats)
    Number,
    /// Double-quoted string literals
    String,
    /// Line comments (// ...)
    Comment,
}

impl TokenType {
    /// All categories in paint order
    pub const ALL: [TokenType; 8] = [
        TokenType::Keyword,
        TokenType::TypeKeyword,
        TokenType::SpecialOperator,
        TokenType::Operator,
        TokenType::Brace,
        TokenType::Number,
        TokenType::String,
        TokenType::Comment,
    ];

    /// Paint priority (higher is painted later and wins overlaps)
    pub fn priority(&self) -> u8 {
        *self as u8
    }

    /// Get the default style for this token type
    pub fn default_style(&self) -> Style {
        match self {
            TokenType::Keyword => Style::fg(Color::Rgb(255, 165, 0)),
            TokenType::TypeKeyword => Style::fg(Color::Rgb(176, 48, 96)),
            TokenType::SpecialOperator => Style::fg(Color::Rgb(255, 140, 0)),
            TokenType::Operator => Style::fg(Color::Red),
            TokenType::Brace => Style::fg(Color::Magenta),
            TokenType::Number => Style::fg(Color::Blue),
            TokenType::String => Style::fg(Color::Green),
            TokenType::Comment => Style::fg(Color::BrightBlack).with_italic(),
        }
    }

    /// Get the config key for this token type
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Keyword => "keyword",
            TokenType::TypeKeyword => "type_keyword",
            TokenType::SpecialOperator => "special_operator",
            TokenType::Operator => "operator",
            TokenType::Brace => "brace",
            TokenType::Number => "number",
            TokenType::String => "string",
            TokenType::Comment => "comment",
        }
    }

    /// Parse a token type from its config key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}
