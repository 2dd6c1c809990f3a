//! Error types for configuration and template expansion

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors that can occur while expanding a template reference
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Referenced file could not be located
    #[error("template file not found: {name}")]
    NotFound { name: String },

    /// Referenced file exists but could not be read
    #[error("error reading template file {path}: {message}")]
    FileReadError { path: PathBuf, message: String },

    /// Directive matched but its captures were unusable
    #[error("malformed template directive: {directive}")]
    MalformedDirective { directive: String },

    /// Template or embed chain re-entered a name it is already expanding
    #[error("circular template reference detected: {chain}")]
    CircularReference { chain: String },

    /// A slide needed more template splices than allowed
    #[error("slide needs more than {limit} template expansions")]
    ExpansionLimitExceeded { limit: usize },

    /// Embeds nested deeper than the inliner allows
    #[error("embed nesting exceeds {limit} levels at {name}")]
    EmbedDepthExceeded { name: String, limit: usize },
}

/// Errors that can occur when loading or validating [`Options`](crate::Options)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read options file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse options TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid separator pattern '{pattern}': {source}")]
    InvalidSeparator {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A slide whose template expansion failed and was left unexpanded
#[derive(Debug)]
pub struct TemplateDiagnostic {
    /// Text that was being expanded when the failure occurred
    pub source: String,
    /// Location of the offending directive inside `source`
    pub span: Span,
    pub error: TemplateError,
}

impl TemplateDiagnostic {
    pub fn new(source: impl Into<String>, span: Span, error: TemplateError) -> Self {
        Self {
            source: source.into(),
            span,
            error,
        }
    }

    /// Format the diagnostic with slide context using ariadne
    pub fn format(&self, filename: &str) -> String {
        let message = self.error.to_string();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Warning, filename, self.span.start)
            .with_message("slide left unexpanded")
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(&message)
                    .with_color(Color::Yellow),
            )
            .finish()
            .write((filename, Source::from(self.source.as_str())), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}

impl std::fmt::Display for TemplateDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {:?})", self.error, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_messages() {
        let err = TemplateError::NotFound {
            name: "title.md".to_string(),
        };
        assert_eq!(err.to_string(), "template file not found: title.md");

        let err = TemplateError::CircularReference {
            chain: "a.md -> b.md -> a.md".to_string(),
        };
        assert!(err.to_string().contains("a.md -> b.md -> a.md"));
    }

    #[test]
    fn test_diagnostic_format_mentions_error() {
        let source = "Intro\n<!-- slide template=\"[[missing]]\" -->\n";
        let diag = TemplateDiagnostic::new(
            source,
            6..43,
            TemplateError::NotFound {
                name: "missing.md".to_string(),
            },
        );
        let report = diag.format("deck.md");
        assert!(report.contains("slide left unexpanded"));
        assert!(report.contains("missing.md"));
    }
}
