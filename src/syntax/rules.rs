//! Pattern rules for syntax highlighting
//!
//! This module defines the rule type used to classify substrings of a
//! line, and the ordered rule table built for each language.

use regex::Regex;

use super::language::LanguageSpec;
use super::style::Style;
use super::theme::Theme;
use super::tokens::TokenType;
use crate::error::{EditorError, Result};

/// Signed decimal integer with an optional long suffix
pub const INTEGER_PATTERN: &str = r"\b[+-]?[0-9]+[lL]?\b";
/// Signed hexadecimal integer with an optional long suffix
pub const HEX_PATTERN: &str = r"\b[+-]?0[xX][0-9A-Fa-f]+[lL]?\b";
/// Signed decimal float with optional exponent
pub const FLOAT_PATTERN: &str = r"\b[+-]?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?\b";
/// Double-quoted string, backslash escapes allowed inside
pub const STRING_PATTERN: &str = r#""([^"\\]|\\.)*""#;
/// `//` to end of line
pub const LINE_COMMENT_PATTERN: &str = r"//[^\n]*";

/// A single pattern rule
///
/// Matches a regex pattern and paints one of its groups with a style.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Which capture group to paint (0 = whole match)
    pub group: usize,
    /// Category of the match
    pub token_type: TokenType,
    /// Style painted over the group
    pub style: Style,
}

impl Rule {
    /// Compile a rule painting the whole match
    pub fn new(name: &str, pattern: &str, token_type: TokenType, style: Style) -> Result<Self> {
        Self::with_group(name, pattern, 0, token_type, style)
    }

    /// Compile a rule painting a specific capture group
    pub fn with_group(
        name: &str,
        pattern: &str,
        group: usize,
        token_type: TokenType,
        style: Style,
    ) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| EditorError::Pattern {
            rule: name.to_string(),
            source,
        })?;
        if group >= regex.captures_len() {
            return Err(EditorError::Message(format!(
                "Rule {} has no capture group {}",
                name, group
            )));
        }
        Ok(Self {
            pattern: regex,
            group,
            token_type,
            style,
        })
    }

    /// Whole-word rule for a reserved word
    pub fn word(word: &str, token_type: TokenType, style: Style) -> Result<Self> {
        Self::new(word, &format!(r"\b{}\b", regex::escape(word)), token_type, style)
    }

    /// Literal rule for an operator or brace, matched anywhere
    pub fn literal(symbol: &str, token_type: TokenType, style: Style) -> Result<Self> {
        Self::new(symbol, &regex::escape(symbol), token_type, style)
    }

    /// Find the next match at or after `start`.
    ///
    /// Returns the painted range and the end of the whole match. Searching
    /// keeps the text before `start` visible so `\b` sees real context.
    pub fn find_at(&self, text: &str, start: usize) -> Option<((usize, usize), usize)> {
        if start > text.len() {
            return None;
        }
        if self.group == 0 {
            return self
                .pattern
                .find_at(text, start)
                .map(|m| ((m.start(), m.end()), m.end()));
        }
        let caps = self.pattern.captures_at(text, start)?;
        let whole = caps.get(0)?;
        match caps.get(self.group) {
            Some(m) => Some(((m.start(), m.end()), whole.end())),
            None => Some(((whole.end(), whole.end()), whole.end())),
        }
    }
}

/// Line state for tracking multi-line constructs
///
/// Rule tables never carry state from one line to the next, so every
/// line ends `Clean`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineState {
    #[default]
    Clean,
}

/// Result of highlighting a single line
#[derive(Debug, PartialEq, Eq)]
pub struct HighlightResult {
    /// Paint commands in the order they were applied
    pub spans: Vec<super::style::Span>,
    /// State at end of line (for next line)
    pub end_state: LineState,
}

/// Ordered rules for one language.
///
/// Rules are kept sorted by [`TokenType::priority`]; within a category the
/// construction order is preserved.
#[derive(Debug, Clone)]
pub struct RuleTable {
    language: String,
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Create an empty table
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            rules: Vec::new(),
        }
    }

    /// Build the full table for a language
    pub fn build(spec: &LanguageSpec, theme: &Theme) -> Result<Self> {
        let mut table = Self::new(&spec.name);

        for word in &spec.keywords {
            table.push(Rule::word(word, TokenType::Keyword, theme.style(TokenType::Keyword))?);
        }
        for word in &spec.type_keywords {
            let style = theme.style(TokenType::TypeKeyword);
            table.push(Rule::word(word, TokenType::TypeKeyword, style)?);
        }
        for symbol in &spec.special_operators {
            let style = theme.style(TokenType::SpecialOperator);
            table.push(Rule::literal(symbol, TokenType::SpecialOperator, style)?);
        }
        for symbol in &spec.operators {
            table.push(Rule::literal(symbol, TokenType::Operator, theme.style(TokenType::Operator))?);
        }
        for symbol in &spec.braces {
            table.push(Rule::literal(symbol, TokenType::Brace, theme.style(TokenType::Brace))?);
        }

        let number = theme.style(TokenType::Number);
        table.push(Rule::new("integer", INTEGER_PATTERN, TokenType::Number, number)?);
        table.push(Rule::new("hex", HEX_PATTERN, TokenType::Number, number)?);
        table.push(Rule::new("float", FLOAT_PATTERN, TokenType::Number, number)?);
        table.push(Rule::new(
            "string",
            STRING_PATTERN,
            TokenType::String,
            theme.style(TokenType::String),
        )?);
        table.push(Rule::new(
            "line_comment",
            LINE_COMMENT_PATTERN,
            TokenType::Comment,
            theme.style(TokenType::Comment),
        )?);

        for extra in &spec.extra_patterns {
            let style = theme.style(extra.token_type);
            table = table.with_rule(Rule::new(&extra.pattern, &extra.pattern, extra.token_type, style)?);
        }

        Ok(table)
    }

    /// Consume the table, returning it with one more rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.push(rule);
        self
    }

    /// Insert a rule after every rule of equal or lower priority
    pub(super) fn push(&mut self, rule: Rule) {
        let idx = self
            .rules
            .partition_point(|r| r.token_type.priority() <= rule.token_type.priority());
        self.rules.insert(idx, rule);
    }

    /// Language this table highlights
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Rules in paint order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::builtin;

    #[test]
    fn test_rule_find_at() {
        let rule = Rule::new("number", r"\d+", TokenType::Number, Style::default()).unwrap();
        assert_eq!(rule.find_at("abc 123 def", 0), Some(((4, 7), 7)));
        assert_eq!(rule.find_at("abc 123 def", 5), Some(((5, 7), 7)));
        assert_eq!(rule.find_at("no numbers", 0), None);
    }

    #[test]
    fn test_word_rule_respects_context() {
        let rule = Rule::word("class", TokenType::Keyword, Style::default()).unwrap();
        assert_eq!(rule.find_at("subclass", 0), None);
        assert_eq!(rule.find_at("classic", 0), None);
        // Starting mid-word must not create a fake boundary
        assert_eq!(rule.find_at("subclass", 3), None);
        assert_eq!(rule.find_at("a class", 0), Some(((2, 7), 7)));
    }

    #[test]
    fn test_literal_rule_escapes() {
        let rule = Rule::literal("+", TokenType::Operator, Style::default()).unwrap();
        assert_eq!(rule.find_at("a + b", 0), Some(((2, 3), 3)));
        let rule = Rule::literal("||", TokenType::Operator, Style::default()).unwrap();
        assert_eq!(rule.find_at("a || b", 0), Some(((2, 4), 4)));
        assert_eq!(rule.find_at("a | b", 0), None);
    }

    #[test]
    fn test_group_rule() {
        let rule = Rule::with_group("call", r"(\w+)\(", 1, TokenType::Keyword, Style::default())
            .unwrap();
        assert_eq!(rule.find_at("x = foo(1)", 0), Some(((4, 7), 8)));
        assert!(Rule::with_group("bad", r"\w+", 1, TokenType::Keyword, Style::default()).is_err());
    }

    #[test]
    fn test_malformed_pattern_fails_at_construction() {
        let err = Rule::new("broken", r"(unclosed", TokenType::Keyword, Style::default())
            .unwrap_err();
        match err {
            EditorError::Pattern { rule, .. } => assert_eq!(rule, "broken"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_table_sorted_by_priority() {
        let table = RuleTable::build(&builtin::swift(), &Theme::new()).unwrap();
        let priorities: Vec<u8> = table.rules().iter().map(|r| r.token_type.priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(table.rules().last().map(|r| r.token_type), Some(TokenType::Comment));
        assert_eq!(table.language(), "Swift");
    }

    #[test]
    fn test_with_rule_keeps_priority_order() {
        let theme = Theme::new();
        let table = RuleTable::build(&builtin::scala(), &theme).unwrap();
        let len = table.len();
        let rule = Rule::word("given", TokenType::Keyword, theme.style(TokenType::Keyword)).unwrap();
        let table = table.with_rule(rule);

        assert_eq!(table.len(), len + 1);
        let idx = table
            .rules()
            .iter()
            .position(|r| r.pattern.as_str() == r"\bgiven\b")
            .unwrap();
        assert!(table.rules()[idx + 1..]
            .iter()
            .all(|r| r.token_type != TokenType::Keyword));
    }
}
