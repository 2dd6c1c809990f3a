//! Template expansion for a single slide

use std::collections::HashSet;

use crate::error::{TemplateDiagnostic, TemplateError};
use crate::footnote::Footnotes;
use crate::inline::Inliner;

use super::chain::ExpansionChain;
use super::directive::{
    find_template, has_template, referenced_templates, strip_empty_markers, Directive,
};
use super::loader::FileLoader;
use super::variables::compute_variables;

/// Placeholder in a template fragment that receives the slide body
pub const CONTENT_PLACEHOLDER: &str = "<% content %>";

/// Upper bound on template splices within one slide
pub const MAX_EXPANSIONS: usize = 100;

/// Expands template references of one slide at a time
#[derive(Clone, Copy)]
pub struct Expander<'a> {
    loader: &'a dyn FileLoader,
    inliner: &'a dyn Inliner,
    footnotes: &'a dyn Footnotes,
}

impl<'a> Expander<'a> {
    pub fn new(
        loader: &'a dyn FileLoader,
        inliner: &'a dyn Inliner,
        footnotes: &'a dyn Footnotes,
    ) -> Self {
        Self {
            loader,
            inliner,
            footnotes,
        }
    }

    /// Expand the first template reference of a slide
    ///
    /// The fragment is loaded, its embeds are inlined, and every
    /// `<% content %>` in it is replaced by the slide with the `template`
    /// attribute removed. A slide without a reference is returned unchanged.
    pub fn transform_slide(&self, slide: &str) -> Result<String, TemplateError> {
        match find_template(slide) {
            None => Ok(slide.to_string()),
            Some(found) => self.splice(slide, &found?),
        }
    }

    /// Fully expand a slide and resolve its variables
    ///
    /// References are followed until none remain. Slides without a reference
    /// use `default_template` when given, and are otherwise returned as is.
    /// A template may be used several times in one slide; it fails only when
    /// its own fragments lead back to it. On failure the diagnostic carries
    /// the text being expanded; callers keep the original slide.
    pub fn expand_slide(
        &self,
        slide: &str,
        default_template: Option<&str>,
    ) -> Result<String, TemplateDiagnostic> {
        let mut current = slide.to_string();
        let mut acyclic = HashSet::new();

        if !has_template(&current) {
            let Some(name) = default_template else {
                return Ok(current);
            };
            let directive = Directive::default_template(name);
            current = self
                .follow(&current, &directive, &mut acyclic)
                .map_err(|error| TemplateDiagnostic::new(slide, 0..0, error))?;
        }

        let mut expansions = 0;
        while let Some(found) = find_template(&current) {
            expansions += 1;
            let next = if expansions > MAX_EXPANSIONS {
                Err(TemplateError::ExpansionLimitExceeded {
                    limit: MAX_EXPANSIONS,
                })
            } else {
                found.and_then(|directive| self.follow(&current, &directive, &mut acyclic))
            };

            match next {
                Ok(next) => current = next,
                Err(error) => {
                    let span = find_template(&current)
                        .and_then(|found| found.ok())
                        .map(|directive| directive.span)
                        .unwrap_or(0..0);
                    return Err(TemplateDiagnostic::new(current, span, error));
                }
            }
        }

        let current = strip_empty_markers(&current);
        Ok(compute_variables(&current, self.footnotes))
    }

    /// Resolve variables of an already expanded slide
    pub fn compute_variables(&self, slide: &str) -> String {
        compute_variables(slide, self.footnotes)
    }

    fn follow(
        &self,
        slide: &str,
        directive: &Directive,
        acyclic: &mut HashSet<String>,
    ) -> Result<String, TemplateError> {
        self.check_acyclic(&directive.file_name(), &mut ExpansionChain::new(), acyclic)?;
        self.splice(slide, directive)
    }

    /// Walk the templates a fragment references, failing on a path that
    /// re-enters a template already on it
    ///
    /// Names proven free of cycles are recorded in `acyclic` and not walked again.
    fn check_acyclic(
        &self,
        name: &str,
        chain: &mut ExpansionChain,
        acyclic: &mut HashSet<String>,
    ) -> Result<(), TemplateError> {
        if acyclic.contains(name) {
            return Ok(());
        }

        chain.start_resolving(name)?;
        let fragment = self.fragment(name)?;
        for referenced in referenced_templates(&fragment)? {
            self.check_acyclic(&referenced, chain, acyclic)?;
        }
        chain.done_resolving();

        acyclic.insert(name.to_string());
        Ok(())
    }

    fn fragment(&self, file_name: &str) -> Result<String, TemplateError> {
        let fragment = self.loader.load(file_name)?;
        self.inliner.inline(&fragment, self.loader)
    }

    fn splice(&self, slide: &str, directive: &Directive) -> Result<String, TemplateError> {
        let fragment = self.fragment(&directive.file_name())?;

        let body = if directive.attribute.is_empty() {
            slide.to_string()
        } else {
            slide.replace(&directive.attribute, "")
        };
        Ok(fragment.replace(CONTENT_PLACEHOLDER, &body))
    }
}
