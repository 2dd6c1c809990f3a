//! Pipeline orchestration
//!
//! Template expansion runs first, then an ordered list of stateless passes.
//! Each pass takes the document and the options and returns a new document.

use tracing::debug;

use crate::config::Options;
use crate::document::trim_ending;
use crate::engine::TemplateEngine;
use crate::error::TemplateDiagnostic;
use crate::ProcessError;

/// A document-to-document transform
pub type PassFn = fn(&str, &Options) -> String;

/// A named pass in the pipeline
#[derive(Debug, Clone, Copy)]
pub struct Pass {
    pub name: &'static str,
    pub apply: PassFn,
}

/// Output of a pipeline run
#[derive(Debug)]
pub struct Processed {
    pub markdown: String,
    /// Slides left unexpanded, from the final template round
    pub diagnostics: Vec<TemplateDiagnostic>,
    /// Template rounds executed
    pub rounds: usize,
    /// False when the template round cap was hit
    pub converged: bool,
}

/// Template engine followed by ordered passes
#[derive(Debug)]
pub struct Pipeline {
    engine: TemplateEngine,
    passes: Vec<Pass>,
}

impl Pipeline {
    /// Create a pipeline with no passes after template expansion
    pub fn new(engine: TemplateEngine) -> Self {
        Self {
            engine,
            passes: Vec::new(),
        }
    }

    /// Append a pass
    pub fn with_pass(mut self, name: &'static str, apply: PassFn) -> Self {
        self.passes.push(Pass { name, apply });
        self
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// Names of the registered passes, in order
    pub fn pass_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|p| p.name)
    }

    /// Process a document
    ///
    /// A trailing separator is trimmed, templates are expanded to a fixed
    /// point, then each pass runs in order. With `options.log` set, every stage
    /// that changed the document is logged at debug level.
    pub fn process(&self, markdown: &str, options: &mut Options) -> Result<Processed, ProcessError> {
        let separators = options.separators()?;
        let trimmed = trim_ending(markdown, &separators);
        let expansion = self.engine.run(&trimmed, options)?;

        if options.log {
            log_stage("markdown", "", markdown);
            log_stage("merge & template", markdown, &expansion.markdown);
        }

        let mut current = expansion.markdown;
        for pass in &self.passes {
            let next = (pass.apply)(&current, options);
            if options.log {
                log_stage(pass.name, &current, &next);
            }
            current = next;
        }

        Ok(Processed {
            markdown: current,
            diagnostics: expansion.diagnostics,
            rounds: expansion.rounds,
            converged: expansion.converged,
        })
    }
}

fn log_stage(name: &str, before: &str, after: &str) {
    if before != after {
        debug!(stage = name, "{after}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footnote::KeepFootnotes;
    use crate::inline::NoInline;
    use crate::template::MemoryLoader;
    use pretty_assertions::assert_eq;

    fn shout(markdown: &str, _: &Options) -> String {
        markdown.to_uppercase()
    }

    fn exclaim(markdown: &str, _: &Options) -> String {
        format!("{markdown}!")
    }

    fn pipeline(loader: MemoryLoader) -> Pipeline {
        Pipeline::new(
            TemplateEngine::new(loader)
                .with_inliner(NoInline)
                .with_footnotes(KeepFootnotes),
        )
    }

    #[test]
    fn test_passes_run_in_order_after_templates() {
        let loader = MemoryLoader::new().with_file("t.md", "<% content %> done");
        let pipeline = pipeline(loader)
            .with_pass("shout", shout)
            .with_pass("exclaim", exclaim);
        assert_eq!(pipeline.pass_names().collect::<Vec<_>>(), vec!["shout", "exclaim"]);

        let mut options = Options::default();
        let out = pipeline
            .process("<!-- slide template=\"[[t]]\" -->go", &mut options)
            .expect("processes");
        assert_eq!(out.markdown, "GO DONE!");
        assert!(out.converged);
    }

    #[test]
    fn test_trailing_separator_trimmed() {
        let mut options = Options::default();
        let out = pipeline(MemoryLoader::new())
            .process("a\n---\nb\n---", &mut options)
            .expect("processes");
        assert_eq!(out.markdown, "a\n---\nb");
    }

    #[test]
    fn test_logging_does_not_change_output() {
        let mut options = Options::default().with_log(true);
        let out = pipeline(MemoryLoader::new())
            .with_pass("shout", shout)
            .process("abc", &mut options)
            .expect("processes");
        assert_eq!(out.markdown, "ABC");
    }

    #[test]
    fn test_invalid_separator_fails() {
        let mut options = Options::default().with_vertical_separator("(");
        let result = pipeline(MemoryLoader::new()).process("abc", &mut options);
        assert!(matches!(result, Err(ProcessError::Config(_))));
    }
}
