//! Fixed-point template driver
//!
//! Each round inlines embeds across the whole document and then expands the
//! templates of every slide. Rounds repeat until the document stops changing.
//! Expanded templates can introduce new separators or embeds, which is why a
//! single pass is not enough.

use tracing::{debug, warn};

use crate::config::{Options, Separators};
use crate::document::map_slides;
use crate::error::{ConfigError, TemplateDiagnostic, TemplateError};
use crate::footnote::{Footnotes, SequentialFootnotes};
use crate::inline::{EmbedInliner, Inliner};
use crate::template::{Expander, FileLoader};

/// Upper bound on expansion rounds
pub const MAX_ROUNDS: usize = 9;

/// Result of running the driver
#[derive(Debug)]
pub struct Expansion {
    pub markdown: String,
    /// Number of rounds executed
    pub rounds: usize,
    /// False when the round cap was hit before the document stabilized
    pub converged: bool,
    /// Slides that failed to expand in the last round
    pub diagnostics: Vec<TemplateDiagnostic>,
}

/// Template engine with its file, inlining and footnote collaborators
pub struct TemplateEngine {
    loader: Box<dyn FileLoader>,
    inliner: Box<dyn Inliner>,
    footnotes: Box<dyn Footnotes>,
}

impl TemplateEngine {
    /// Create an engine with embed inlining and sequential footnotes
    pub fn new(loader: impl FileLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            inliner: Box::new(EmbedInliner::default()),
            footnotes: Box::new(SequentialFootnotes),
        }
    }

    /// Set the multi-file inliner
    pub fn with_inliner(mut self, inliner: impl Inliner + 'static) -> Self {
        self.inliner = Box::new(inliner);
        self
    }

    /// Set the footnote renumbering strategy
    pub fn with_footnotes(mut self, footnotes: impl Footnotes + 'static) -> Self {
        self.footnotes = Box::new(footnotes);
        self
    }

    /// Slide-level expander borrowing this engine's collaborators
    pub fn expander(&self) -> Expander<'_> {
        Expander::new(
            self.loader.as_ref(),
            self.inliner.as_ref(),
            self.footnotes.as_ref(),
        )
    }

    /// Expand the first template reference of a single slide
    pub fn transform_slide(&self, slide: &str) -> Result<String, TemplateError> {
        self.expander().transform_slide(slide)
    }

    /// Resolve named blocks and placeholders of a single slide
    pub fn compute_variables(&self, slide: &str) -> String {
        self.expander().compute_variables(slide)
    }

    /// Expand every slide of a document once
    ///
    /// Slides that fail keep their text; their diagnostics are returned.
    pub fn expand_document(
        &self,
        markdown: &str,
        separators: &Separators,
        default_template: Option<&str>,
    ) -> (String, Vec<TemplateDiagnostic>) {
        let expander = self.expander();
        let mut diagnostics = Vec::new();

        let output = map_slides(markdown, separators, |slide| {
            match expander.expand_slide(slide, default_template) {
                Ok(expanded) => expanded,
                Err(diagnostic) => {
                    warn!(error = %diagnostic.error, "cannot process template");
                    diagnostics.push(diagnostic);
                    slide.to_string()
                }
            }
        });

        (output, diagnostics)
    }

    /// Run inline and expand rounds until the document is stable
    ///
    /// `options.default_template` is consumed by the first round. Hitting
    /// [`MAX_ROUNDS`] is not an error: a warning is logged and the last result
    /// is returned.
    pub fn run(&self, markdown: &str, options: &mut Options) -> Result<Expansion, ConfigError> {
        let separators = options.separators()?;
        let mut before = markdown.to_string();
        let mut diagnostics = Vec::new();

        for round in 1..=MAX_ROUNDS {
            let inlined = match self.inliner.inline(&before, self.loader.as_ref()) {
                Ok(inlined) => inlined,
                Err(e) => {
                    warn!(round, error = %e, "cannot inline embedded files");
                    before.clone()
                }
            };

            let default_template = options.default_template.take();
            let (after, round_diagnostics) =
                self.expand_document(&inlined, &separators, default_template.as_deref());
            diagnostics = round_diagnostics;

            let changed = after != before;
            debug!(round, changed, failed = diagnostics.len(), "template round finished");
            if !changed {
                return Ok(Expansion {
                    markdown: after,
                    rounds: round,
                    converged: true,
                    diagnostics,
                });
            }
            before = after;
        }

        warn!(
            rounds = MAX_ROUNDS,
            "circuit in template hierarchy detected, using last result"
        );
        Ok(Expansion {
            markdown: before,
            rounds: MAX_ROUNDS,
            converged: false,
            diagnostics,
        })
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footnote::KeepFootnotes;
    use crate::inline::NoInline;
    use crate::template::MemoryLoader;
    use pretty_assertions::assert_eq;

    /// Appends a marker on every call, so the document never stabilizes
    struct Growing;

    impl Inliner for Growing {
        fn inline(&self, content: &str, _: &dyn FileLoader) -> Result<String, TemplateError> {
            Ok(format!("{content}+"))
        }
    }

    fn engine(loader: MemoryLoader) -> TemplateEngine {
        TemplateEngine::new(loader)
            .with_inliner(NoInline)
            .with_footnotes(KeepFootnotes)
    }

    #[test]
    fn test_run_without_templates_converges_in_one_round() {
        let mut options = Options::default();
        let doc = "# One\n---\n# Two";
        let result = engine(MemoryLoader::new()).run(doc, &mut options).expect("runs");
        assert_eq!(result.markdown, doc);
        assert_eq!(result.rounds, 1);
        assert!(result.converged);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_run_expands_each_slide() {
        let loader = MemoryLoader::new().with_file("t.md", "[<% content %>]");
        let doc = "<!-- slide template=\"[[t]]\" -->a\n---\nb\n--\n<!-- slide template=\"[[t]]\" -->c";
        let mut options = Options::default();
        let result = engine(loader).run(doc, &mut options).expect("runs");
        assert_eq!(result.markdown, "[a]\n---\nb\n--\n[c]");
        assert_eq!(result.rounds, 2);
    }

    #[test]
    fn test_default_template_cleared_after_first_round() {
        let loader = MemoryLoader::new().with_file("base.md", "<% content %>!");
        let mut options = Options::default().with_default_template("base");
        let result = engine(loader).run("a\n---\nb", &mut options).expect("runs");
        assert_eq!(result.markdown, "a!\n---\nb!");
        assert_eq!(options.default_template, None);
    }

    #[test]
    fn test_failed_slide_is_kept_and_reported() {
        let loader = MemoryLoader::new().with_file("ok.md", "ok:<% content %>");
        let doc = "<!-- slide template=\"[[ok]]\" -->1\n---\n<!-- slide template=\"[[missing]]\" -->2";
        let mut options = Options::default();
        let result = engine(loader).run(doc, &mut options).expect("runs");
        assert_eq!(
            result.markdown,
            "ok:1\n---\n<!-- slide template=\"[[missing]]\" -->2"
        );
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            result.diagnostics[0].error,
            TemplateError::NotFound { .. }
        ));
    }

    #[test]
    fn test_round_cap_terminates() {
        let engine = TemplateEngine::new(MemoryLoader::new())
            .with_inliner(Growing)
            .with_footnotes(KeepFootnotes);
        let mut options = Options::default();
        let result = engine.run("x", &mut options).expect("runs");
        assert!(!result.converged);
        assert_eq!(result.rounds, MAX_ROUNDS);
        assert_eq!(result.markdown, format!("x{}", "+".repeat(MAX_ROUNDS)));
    }

    #[test]
    fn test_inline_failure_keeps_embed_and_expands_slides() {
        let loader = MemoryLoader::new()
            .with_file("a.md", "![[b]]")
            .with_file("b.md", "![[a]]")
            .with_file("t.md", "[<% content %>]");
        let engine = TemplateEngine::new(loader).with_footnotes(KeepFootnotes);
        let mut options = Options::default();
        let result = engine
            .run("![[a]]\n---\n<!-- slide template=\"[[t]]\" -->x", &mut options)
            .expect("runs");
        assert_eq!(result.markdown, "![[a]]\n---\n[x]");
        assert!(result.converged);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_separator_is_config_error() {
        let mut options = Options::default().with_separator("[");
        let result = engine(MemoryLoader::new()).run("x", &mut options);
        assert!(matches!(result, Err(ConfigError::InvalidSeparator { .. })));
    }

    #[test]
    fn test_engine_slide_operations() {
        let loader = MemoryLoader::new().with_file("T.md", "X<% content %>Y");
        let engine = engine(loader);
        assert_eq!(
            engine
                .transform_slide("A<!--slide template=\"[[T]]\"-->")
                .expect("expands"),
            "XA<!--slide -->Y"
        );
        assert_eq!(engine.compute_variables("<%? gone %>"), "");
    }
}
