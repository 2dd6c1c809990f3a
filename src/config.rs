//! Processing options
//!
//! Options are threaded explicitly through every call. The only field the
//! engine mutates is `default_template`, which is consumed by the first
//! expansion round.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::ConfigError;

/// Default horizontal slide separator
pub const DEFAULT_SEPARATOR: &str = r"\r?\n---\r?\n";

/// Default vertical slide separator
pub const DEFAULT_VERTICAL_SEPARATOR: &str = r"\r?\n--\r?\n";

/// Options controlling how a document is split and expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Pattern separating slide groups
    pub separator: String,
    /// Pattern separating slides inside a group
    pub vertical_separator: String,
    /// Template applied to slides without their own directive (first round only)
    pub default_template: Option<String>,
    /// Log the output of every pipeline stage that changed the document
    pub log: bool,
}

/// TOML structure for deserializing options
#[derive(Deserialize)]
struct TomlOptions {
    separator: Option<String>,
    vertical_separator: Option<String>,
    default_template: Option<String>,
    log: Option<bool>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            vertical_separator: DEFAULT_VERTICAL_SEPARATOR.to_string(),
            default_template: None,
            log: false,
        }
    }
}

impl Options {
    /// Create options with default separators
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load options from a TOML string; missing keys keep their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlOptions = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(Options {
            separator: parsed.separator.unwrap_or(defaults.separator),
            vertical_separator: parsed
                .vertical_separator
                .unwrap_or(defaults.vertical_separator),
            default_template: parsed.default_template.filter(|t| !t.trim().is_empty()),
            log: parsed.log.unwrap_or(defaults.log),
        })
    }

    /// Set the slide group separator pattern
    pub fn with_separator(mut self, pattern: impl Into<String>) -> Self {
        self.separator = pattern.into();
        self
    }

    /// Set the vertical slide separator pattern
    pub fn with_vertical_separator(mut self, pattern: impl Into<String>) -> Self {
        self.vertical_separator = pattern.into();
        self
    }

    /// Set the template applied to slides lacking a directive
    pub fn with_default_template(mut self, name: impl Into<String>) -> Self {
        self.default_template = Some(name.into());
        self
    }

    /// Enable or disable stage logging
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Compile both separator patterns
    pub fn separators(&self) -> Result<Separators, ConfigError> {
        Ok(Separators {
            horizontal: compile_separator(&self.separator)?,
            vertical: compile_separator(&self.vertical_separator)?,
        })
    }
}

/// Compiled separator patterns
#[derive(Debug, Clone)]
pub struct Separators {
    pub horizontal: Regex,
    pub vertical: Regex,
}

/// Separators are matched multi-line and case-insensitive
fn compile_separator(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidSeparator {
            pattern: pattern.to_string(),
            source,
        })
}
