//! Configuration file support
//!
//! Loads settings from ~/.swifty.toml (or %USERPROFILE%\.swifty.toml on Windows)
//!
//! Example:
//! ```text
//! # swifty configuration
//! line-numbers = true
//! tab-width = 4
//! console-height = 10
//! default-interpreter = "python3"
//!
//! [theme]
//! keyword = "#ffa500"
//! comment = "gray"
//!
//! [languages.swift]
//! interpreter = "/usr/bin/env swift"
//! extra-keywords = ["async", "await"]
//! extra-patterns = [{ pattern = "@\\w+", category = "special_operator" }]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::console::DEFAULT_SCROLLBACK;
use crate::error::{EditorError, Result};
use crate::syntax::{self, split_command, ExtraPattern, LanguageSpec, Theme, TokenType};

/// Configuration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Whether to show line numbers
    #[serde(rename = "line-numbers")]
    pub show_line_numbers: bool,
    /// Tab width for display and the tab key
    pub tab_width: usize,
    /// Rows given to the console pane
    pub console_height: u16,
    /// Lines kept in the console
    pub console_scrollback: usize,
    /// Interpreter for files no language claims
    pub default_interpreter: Option<String>,
    /// Per-category color overrides
    pub theme: HashMap<String, String>,
    /// Per-language overrides, keyed by lowercase language name
    pub languages: HashMap<String, LanguageConfig>,
    /// File these settings were read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Overrides for one built-in language
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LanguageConfig {
    pub interpreter: Option<String>,
    pub extra_keywords: Vec<String>,
    pub extra_type_keywords: Vec<String>,
    pub extra_patterns: Vec<PatternConfig>,
}

/// A custom highlight pattern
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    pub pattern: String,
    pub category: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_line_numbers: false,
            tab_width: 4,
            console_height: 10,
            console_scrollback: DEFAULT_SCROLLBACK,
            default_interpreter: None,
            theme: HashMap::new(),
            languages: HashMap::new(),
            source: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".swifty.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".swifty.toml"))
        }
    }

    /// Load configuration from the default location (defaults if absent)
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents, path)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse config file contents
    fn parse(contents: &str, path: &Path) -> Result<Self> {
        let mut config: Config = toml::from_str(contents).map_err(|e| EditorError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.clamp();
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Keep numeric settings in usable ranges
    fn clamp(&mut self) {
        self.tab_width = self.tab_width.clamp(1, 16);
        self.console_height = self.console_height.clamp(3, 100);
        self.console_scrollback = self.console_scrollback.max(10);
    }

    /// Build the highlight theme
    pub fn theme(&self) -> Result<Theme> {
        Theme::with_overrides(&self.theme).map_err(|e| self.invalid(e.to_string()))
    }

    /// A config error pointing at the file these settings came from
    fn invalid(&self, message: String) -> EditorError {
        EditorError::Config {
            path: self.source.clone().unwrap_or_default(),
            message,
        }
    }

    /// Built-in languages with this config's overrides applied
    pub fn language_specs(&self) -> Result<Vec<LanguageSpec>> {
        let mut specs = syntax::all_languages();

        for (name, overrides) in &self.languages {
            let spec = specs
                .iter_mut()
                .find(|spec| spec.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| self.invalid(format!("Unknown language: {}", name)))?;

            if let Some(command) = &overrides.interpreter {
                spec.interpreter = split_command(command);
            }
            spec.keywords.extend(overrides.extra_keywords.iter().cloned());
            spec.type_keywords
                .extend(overrides.extra_type_keywords.iter().cloned());
            for extra in &overrides.extra_patterns {
                let token_type = TokenType::from_name(&extra.category)
                    .ok_or_else(|| self.invalid(format!("Unknown category: {}", extra.category)))?;
                spec.extra_patterns.push(ExtraPattern {
                    pattern: extra.pattern.clone(),
                    token_type,
                });
            }
        }

        Ok(specs)
    }

    /// Interpreter for files no language claims
    pub fn default_interpreter(&self) -> Option<Vec<String>> {
        self.default_interpreter
            .as_deref()
            .map(split_command)
            .filter(|words| !words.is_empty())
    }
}
