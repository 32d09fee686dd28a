//! Scala language definition

use super::{BRACES, OPERATORS};
use crate::syntax::language::LanguageSpec;

const KEYWORDS: &[&str] = &[
    "abstract", "finally", "object", "trait",
    "case", "for", "override", "true",
    "catch", "forSome", "package", "try",
    "class", "if", "private", "type",
    "def", "implicit", "protected", "val",
    "do", "import", "return", "var",
    "else", "lazy", "sealed", "while",
    "extends", "match", "super", "with",
    "false", "new", "this", "yield",
    "final", "null", "throw", "func",
];

const SPECIAL_OPERATORS: &[&str] = &["⇒", "=>", "=", "<%", "<:", "←", "<-", "#", "@", ":", "_"];

/// Create Scala language definition
pub fn scala() -> LanguageSpec {
    LanguageSpec::new("Scala")
        .extensions(&["scala", "sc"])
        .keywords(KEYWORDS)
        .special_operators(SPECIAL_OPERATORS)
        .operators(OPERATORS)
        .braces(BRACES)
        .interpreter("scala")
}
