//! Multi-file inlining
//!
//! Note embeds (`![[other-note]]`) pull the content of another markdown file
//! into the document before template expansion runs. Embeds of other file
//! types are left for later passes.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TemplateError;
use crate::template::{with_extension, ExpansionChain, FileLoader};

/// Default nesting limit for embeds inside embedded files
pub const DEFAULT_MAX_DEPTH: usize = 10;

static EMBED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[\[([^\]|#]+)(?:\|[^\]]*)?\]\]").expect("embed pattern is valid")
});

/// Resolves cross-file inclusion directives
pub trait Inliner {
    fn inline(&self, content: &str, loader: &dyn FileLoader) -> Result<String, TemplateError>;
}

/// Performs no inlining
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInline;

impl Inliner for NoInline {
    fn inline(&self, content: &str, _loader: &dyn FileLoader) -> Result<String, TemplateError> {
        Ok(content.to_string())
    }
}

/// Replaces markdown note embeds with the embedded file's content
///
/// Embeds that cannot be found are kept verbatim. Heading and block embeds
/// (`![[note#section]]`) are not matched.
#[derive(Debug, Clone, Copy)]
pub struct EmbedInliner {
    max_depth: usize,
}

impl Default for EmbedInliner {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EmbedInliner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how deep embeds may nest
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn inline_with_chain(
        &self,
        content: &str,
        loader: &dyn FileLoader,
        chain: &mut ExpansionChain,
    ) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(content.len());
        let mut last = 0;

        for caps in EMBED.captures_iter(content) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            output.push_str(&content[last..whole.start()]);
            last = whole.end();

            match self.embed(name.as_str().trim(), loader, chain)? {
                Some(embedded) => output.push_str(&embedded),
                None => output.push_str(whole.as_str()),
            }
        }

        output.push_str(&content[last..]);
        Ok(output)
    }

    fn embed(
        &self,
        name: &str,
        loader: &dyn FileLoader,
        chain: &mut ExpansionChain,
    ) -> Result<Option<String>, TemplateError> {
        if !is_markdown(name) {
            return Ok(None);
        }

        let file = with_extension(name);
        if chain.depth() >= self.max_depth && !chain.is_resolving(&file) {
            return Err(TemplateError::EmbedDepthExceeded {
                name: file,
                limit: self.max_depth,
            });
        }

        let content = match loader.load(&file) {
            Ok(content) => content,
            Err(TemplateError::NotFound { .. }) => {
                tracing::debug!(embed = %file, "embed target not found, keeping link");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        chain.start_resolving(&file)?;
        let result = self.inline_with_chain(&content, loader, chain);
        chain.done_resolving();
        result.map(Some)
    }
}

impl Inliner for EmbedInliner {
    fn inline(&self, content: &str, loader: &dyn FileLoader) -> Result<String, TemplateError> {
        self.inline_with_chain(content, loader, &mut ExpansionChain::new())
    }
}

/// Embeds without an extension or with `.md` refer to notes
fn is_markdown(name: &str) -> bool {
    match Path::new(name).extension() {
        None => true,
        Some(ext) => ext.eq_ignore_ascii_case("md"),
    }
}
