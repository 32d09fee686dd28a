//! Highlight theme
//!
//! One style per token category, built once at startup and handed to
//! every rule table by reference.

use std::collections::HashMap;

use super::style::{Color, Style};
use super::tokens::TokenType;
use crate::error::{EditorError, Result};

/// Styles for every token category
#[derive(Debug, Clone)]
pub struct Theme {
    styles: HashMap<TokenType, Style>,
}

impl Theme {
    /// Theme using each category's default style
    pub fn new() -> Self {
        let styles = TokenType::ALL
            .into_iter()
            .map(|t| (t, t.default_style()))
            .collect();
        Self { styles }
    }

    /// Build a theme from config overrides (category name -> color)
    ///
    /// Bold/italic attributes of the default style are kept; only the
    /// foreground color is replaced.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self> {
        let mut theme = Self::new();
        for (name, value) in overrides {
            let token_type = TokenType::from_name(name).ok_or_else(|| {
                EditorError::Message(format!("Unknown theme category: {}", name))
            })?;
            let color = Color::parse(value).ok_or_else(|| {
                EditorError::Message(format!("Invalid color for {}: {}", name, value))
            })?;
            let style = theme.style(token_type).with_fg(color);
            theme.styles.insert(token_type, style);
        }
        Ok(theme)
    }

    /// Style for a token category
    pub fn style(&self, token_type: TokenType) -> Style {
        self.styles
            .get(&token_type)
            .copied()
            .unwrap_or_else(|| token_type.default_style())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = Theme::new();
        assert_eq!(theme.style(TokenType::String), TokenType::String.default_style());
    }

    #[test]
    fn test_override_keeps_attributes() {
        let mut overrides = HashMap::new();
        overrides.insert("comment".to_string(), "#808080".to_string());
        let theme = Theme::with_overrides(&overrides).unwrap();

        let style = theme.style(TokenType::Comment);
        assert_eq!(style.fg, Color::Rgb(128, 128, 128));
        assert!(style.italic);
    }

    #[test]
    fn test_override_rejects_unknown() {
        let mut overrides = HashMap::new();
        overrides.insert("keywords".to_string(), "red".to_string());
        assert!(Theme::with_overrides(&overrides).is_err());

        let mut overrides = HashMap::new();
        overrides.insert("keyword".to_string(), "not-a-color".to_string());
        assert!(Theme::with_overrides(&overrides).is_err());
    }
}
