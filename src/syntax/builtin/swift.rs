//! Swift language definition

use super::{BRACES, OPERATORS};
use crate::syntax::language::LanguageSpec;

const KEYWORDS: &[&str] = &[
    // Declarations
    "class", "deinit", "enum", "extension", "func", "import", "init", "internal", "let",
    "operator", "private", "protocol", "public", "static", "struct", "subscript", "typealias",
    // Statements
    "var", "break", "case", "continue", "default", "do", "else", "fallthrough", "if", "in",
    "for", "return", "switch", "where", "while",
    // Context-specific
    "associativity", "convenience", "dynamic", "didSet", "final", "get", "infix", "inout",
    "lazy", "left", "mutating", "none", "nonmutating", "optional", "override", "postfix",
    "precedence", "prefix", "Protocol", "required", "right", "set", "Type", "unowned", "weak",
    "willSet",
];

const TYPE_KEYWORDS: &[&str] = &[
    "as", "dynamicType", "false", "is", "nil", "self", "Self", "true", "super", "_COLUMN_",
    "_FILE_", "_FUNCTION_", "_LINE_",
];

/// Create Swift language definition
pub fn swift() -> LanguageSpec {
    LanguageSpec::new("Swift")
        .extensions(&["swift"])
        .keywords(KEYWORDS)
        .type_keywords(TYPE_KEYWORDS)
        .operators(OPERATORS)
        .braces(BRACES)
        .interpreter("/usr/bin/env swift")
}
