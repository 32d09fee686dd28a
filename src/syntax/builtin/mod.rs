//! Built-in language definitions
//!
//! This module provides the word lists for the languages the editor
//! can highlight and run out of the box.

mod scala;
mod swift;

use super::language::LanguageSpec;

pub use scala::scala;
pub use swift::swift;

/// Operators shared by the C-family languages below
pub(crate) const OPERATORS: &[&str] = &[
    "=",
    // Comparison
    "==", "===", "!=", "<", "<=", ">", ">=",
    // Arithmetic
    "+", "-", "*", "/", "%",
    // Bitwise
    "&", "|", "^", "~", "<<", ">>", ">>>",
    // Boolean
    "&&", "||", "!",
];

pub(crate) const BRACES: &[&str] = &["{", "}", "[", "]", "(", ")"];

/// Get all built-in language definitions
pub fn all_languages() -> Vec<LanguageSpec> {
    vec![swift(), scala()]
}
