//! Syntax highlighting manager
//!
//! This module provides the SyntaxManager that coordinates language
//! detection and rule tables, and the per-buffer line cache.

use std::path::Path;

use tracing::debug;

use super::language::LanguageSpec;
use super::rules::RuleTable;
use super::style::StyledLine;
use super::theme::Theme;
use crate::error::Result;

/// Per-buffer highlighting cache
///
/// A line is re-highlighted whenever the buffer reports its text changed.
#[derive(Debug, Default)]
pub struct HighlightCache {
    /// Language for this buffer (None if no highlighting)
    pub language: Option<String>,
    /// Cached styling per line (None = not computed)
    line_spans: Vec<Option<StyledLine>>,
}

impl HighlightCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language for this buffer
    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language;
        self.invalidate_all();
    }

    /// Forget the styling of one line
    pub fn invalidate_line(&mut self, line: usize) {
        if let Some(slot) = self.line_spans.get_mut(line) {
            *slot = None;
        }
    }

    /// A line was inserted before `line`
    pub fn insert_line(&mut self, line: usize) {
        if line <= self.line_spans.len() {
            self.line_spans.insert(line, None);
        }
    }

    /// The line at `line` was removed
    pub fn remove_line(&mut self, line: usize) {
        if line < self.line_spans.len() {
            self.line_spans.remove(line);
        }
    }

    /// Invalidate entire cache
    pub fn invalidate_all(&mut self) {
        self.line_spans.clear();
    }

    /// Ensure cache vector is large enough
    fn ensure_size(&mut self, line_count: usize) {
        if self.line_spans.len() < line_count {
            self.line_spans.resize(line_count, None);
        }
    }
}

/// Main syntax highlighting manager
pub struct SyntaxManager {
    /// Language definitions paired with their built tables
    languages: Vec<(LanguageSpec, RuleTable)>,
    /// Whether syntax highlighting is enabled
    pub enabled: bool,
}

impl SyntaxManager {
    /// Build rule tables for every language up front
    pub fn new(specs: Vec<LanguageSpec>, theme: &Theme) -> Result<Self> {
        let mut languages = Vec::with_capacity(specs.len());
        for spec in specs {
            let table = RuleTable::build(&spec, theme)?;
            debug!(language = table.language(), rules = table.len(), "built rule table");
            languages.push((spec, table));
        }
        Ok(Self {
            languages,
            enabled: true,
        })
    }

    /// Detect language from filename
    pub fn detect_language(&self, filename: &Path) -> Option<&str> {
        let ext = filename.extension()?.to_str()?;
        self.languages
            .iter()
            .find(|(spec, _)| spec.matches_extension(ext))
            .map(|(spec, _)| spec.name.as_str())
    }

    /// Get a language definition by name
    pub fn spec(&self, name: &str) -> Option<&LanguageSpec> {
        self.languages
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(spec, _)| spec)
    }

    /// Get the rule table for a language
    pub fn table(&self, name: &str) -> Option<&RuleTable> {
        self.languages
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, table)| table)
    }

    /// Interpreter command configured for the language of `filename`
    pub fn interpreter_for(&self, filename: &Path) -> Option<&[String]> {
        let name = self.detect_language(filename)?;
        self.spec(name)
            .map(|spec| spec.interpreter.as_slice())
            .filter(|command| !command.is_empty())
    }

    /// Highlight a single line, using the cache if available
    pub fn highlight_line(
        &self,
        cache: &mut HighlightCache,
        line_idx: usize,
        text: &str,
        line_count: usize,
    ) -> StyledLine {
        if !self.enabled {
            return StyledLine::new(text);
        }

        let table = match cache.language.as_deref().and_then(|name| self.table(name)) {
            Some(table) => table,
            None => return StyledLine::new(text),
        };

        cache.ensure_size(line_count);
        if let Some(Some(styled)) = cache.line_spans.get(line_idx) {
            if styled.text() == text {
                return styled.clone();
            }
        }

        let styled = table.styled_line(text);
        if let Some(slot) = cache.line_spans.get_mut(line_idx) {
            *slot = Some(styled.clone());
        }
        styled
    }

    /// List available languages
    pub fn list_languages(&self) -> Vec<&str> {
        self.languages.iter().map(|(spec, _)| spec.name.as_str()).collect()
    }

    /// Toggle syntax highlighting on/off
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::builtin;
    use crate::syntax::style::Style;

    fn manager() -> SyntaxManager {
        SyntaxManager::new(builtin::all_languages(), &Theme::new()).unwrap()
    }

    #[test]
    fn test_detect_language() {
        let manager = manager();

        assert_eq!(manager.detect_language(Path::new("main.swift")), Some("Swift"));
        assert_eq!(manager.detect_language(Path::new("Main.SCALA")), Some("Scala"));
        assert_eq!(manager.detect_language(Path::new("build.sc")), Some("Scala"));
        assert_eq!(manager.detect_language(Path::new("main.rs")), None);
        assert_eq!(manager.detect_language(Path::new("no_extension")), None);
    }

    #[test]
    fn test_interpreter_for() {
        let manager = manager();
        let scala = manager.interpreter_for(Path::new("Main.scala")).unwrap();
        assert_eq!(scala, ["scala".to_string()]);
        assert!(manager.interpreter_for(Path::new("notes.txt")).is_none());
    }

    #[test]
    fn test_highlight_line() {
        let manager = manager();
        let mut cache = HighlightCache::new();
        cache.set_language(Some("Swift".to_string()));

        let styled = manager.highlight_line(&mut cache, 0, "let x = 42", 1);
        assert!(!styled.runs().is_empty());
    }

    #[test]
    fn test_cache_tracks_changed_text() {
        let manager = manager();
        let mut cache = HighlightCache::new();
        cache.set_language(Some("Swift".to_string()));

        let first = manager.highlight_line(&mut cache, 0, "let x = 1", 2);
        let second = manager.highlight_line(&mut cache, 0, "x", 2);
        assert_ne!(first, second);
        assert!(second.runs().is_empty());

        cache.insert_line(0);
        cache.remove_line(0);
        cache.invalidate_line(0);
        let third = manager.highlight_line(&mut cache, 0, "let x = 1", 2);
        assert_eq!(first, third);
    }

    #[test]
    fn test_no_language() {
        let manager = manager();
        let mut cache = HighlightCache::new();

        let styled = manager.highlight_line(&mut cache, 0, "let x = 1", 1);
        assert!(styled.runs().is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut manager = manager();
        let mut cache = HighlightCache::new();
        cache.set_language(Some("Scala".to_string()));
        manager.toggle();

        let styled = manager.highlight_line(&mut cache, 0, "val x = 1", 1);
        assert_eq!(styled.style_at(0), Style::default());
        assert_eq!(manager.list_languages(), vec!["Swift", "Scala"]);
    }
}
