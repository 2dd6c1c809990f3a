//! Slide Weaver - template expansion for markdown slide decks
//!
//! Slides name template fragments in directive comments. The engine splices
//! each slide into its template, follows chained templates, inlines embedded
//! notes, and fills placeholders from named blocks, repeating until the
//! document is stable.
//!
//! # Example
//!
//! ```rust
//! use slide_weaver::{process, MemoryLoader, Options};
//!
//! let loader = MemoryLoader::new().with_file("title.md", "# <% content %>");
//! let mut options = Options::default();
//!
//! let out = process(
//!     "<!-- .slide template=\"[[title]]\" -->Welcome\n---\nNext",
//!     loader,
//!     &mut options,
//! )
//! .unwrap();
//!
//! assert_eq!(out.markdown, "# Welcome\n---\nNext");
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod footnote;
pub mod inline;
pub mod pipeline;
pub mod template;

pub use config::{Options, Separators};
pub use engine::{Expansion, TemplateEngine, MAX_ROUNDS};
pub use error::{ConfigError, TemplateDiagnostic, TemplateError};
pub use footnote::{Footnotes, KeepFootnotes, SequentialFootnotes};
pub use inline::{EmbedInliner, Inliner, NoInline};
pub use pipeline::{Pass, PassFn, Pipeline, Processed};
pub use template::{DirectoryLoader, FileLoader, MemoryLoader};

use thiserror::Error;

/// Errors that stop a document from being processed
///
/// Template failures are not among them: a slide that cannot be expanded
/// keeps its text and is reported through [`Processed::diagnostics`].
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Invalid or unreadable options
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Process a document with the default engine and no extra passes
///
/// # Example
///
/// ```rust
/// use slide_weaver::{process, MemoryLoader, Options};
///
/// let loader = MemoryLoader::new().with_file(
///     "card.md",
///     "<div class=\"card\">\n<% body %>\n</div>\n<%? note %>\n<% content %>",
/// );
/// let mut options = Options::default();
///
/// let out = process(
///     "<!-- slide template=\"[[card]]\" -->\n::: body\nHello\n:::",
///     loader,
///     &mut options,
/// )
/// .unwrap();
///
/// assert!(out.markdown.contains("::: block\nHello"));
/// assert!(!out.markdown.contains("<%? note %>"));
/// ```
pub fn process(
    markdown: &str,
    loader: impl FileLoader + 'static,
    options: &mut Options,
) -> Result<Processed, ProcessError> {
    Pipeline::new(TemplateEngine::new(loader)).process(markdown, options)
}
