//! Language definitions for syntax highlighting
//!
//! A `LanguageSpec` is the static word lists a rule table is built from,
//! plus the file extensions and interpreter command for the language.

use super::tokens::TokenType;

/// A user-supplied pattern appended to a language's table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraPattern {
    pub pattern: String,
    pub token_type: TokenType,
}

/// Word lists and run command for one language
#[derive(Debug, Clone, Default)]
pub struct LanguageSpec {
    /// Language name (e.g., "Swift", "Scala")
    pub name: String,
    /// File extensions without the dot
    pub extensions: Vec<String>,
    /// Reserved words, matched as whole words
    pub keywords: Vec<String>,
    /// Type-like reserved words, matched as whole words
    pub type_keywords: Vec<String>,
    /// Language-specific operators, matched literally
    pub special_operators: Vec<String>,
    /// Operators, matched literally
    pub operators: Vec<String>,
    /// Brackets, matched literally
    pub braces: Vec<String>,
    /// Extra patterns from the config file
    pub extra_patterns: Vec<ExtraPattern>,
    /// Program and leading arguments used to run a file
    pub interpreter: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl LanguageSpec {
    /// Create a new empty language definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Builder: file extensions
    pub fn extensions(mut self, exts: &[&str]) -> Self {
        self.extensions = owned(exts);
        self
    }

    /// Builder: reserved words
    pub fn keywords(mut self, words: &[&str]) -> Self {
        self.keywords = owned(words);
        self
    }

    /// Builder: type-like reserved words
    pub fn type_keywords(mut self, words: &[&str]) -> Self {
        self.type_keywords = owned(words);
        self
    }

    /// Builder: language-specific operators
    pub fn special_operators(mut self, symbols: &[&str]) -> Self {
        self.special_operators = owned(symbols);
        self
    }

    /// Builder: operators
    pub fn operators(mut self, symbols: &[&str]) -> Self {
        self.operators = owned(symbols);
        self
    }

    /// Builder: brackets
    pub fn braces(mut self, symbols: &[&str]) -> Self {
        self.braces = owned(symbols);
        self
    }

    /// Builder: interpreter command line, split on whitespace
    pub fn interpreter(mut self, command: &str) -> Self {
        self.interpreter = split_command(command);
        self
    }

    /// Check whether a file extension belongs to this language
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Split a command line on whitespace
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
