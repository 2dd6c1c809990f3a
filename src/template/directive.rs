//! Slide directive syntax
//!
//! A template reference is an HTML comment carrying the `slide` token and a
//! `template="[[name]]"` attribute:
//!
//! ```text
//! <!-- .slide: data-background="navy" template="[[layouts/title]]" -->
//! ```
//!
//! The same comment without any attribute is an empty slide marker and is
//! removed once expansion is finished.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Span, TemplateError};

/// Extension appended to template names that lack it
pub const TEMPLATE_EXTENSION: &str = ".md";

static TEMPLATE_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<!--\s*(?:\.)?slide.*(template="\[\[([^\]]+)\]\]"\s*).*-->"#)
        .expect("template comment pattern is valid")
});

static EMPTY_SLIDE_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<!--\s*(?:\.)?slide(?::)?\s*-->").expect("empty slide pattern is valid")
});

/// A template reference found in a slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Template name as written, without extension normalization
    pub name: String,
    /// The `template="[[...]]"` attribute text, removed from the slide body on splice
    pub attribute: String,
    /// Location of the whole comment in the slide
    pub span: Span,
}

impl Directive {
    /// A directive standing in for a configured default template
    ///
    /// Its attribute is empty, so the slide body is spliced unchanged.
    pub fn default_template(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute: String::new(),
            span: 0..0,
        }
    }

    /// Template file name with the default extension applied
    pub fn file_name(&self) -> String {
        with_extension(&self.name)
    }
}

/// Check whether a slide carries a template reference
pub fn has_template(slide: &str) -> bool {
    TEMPLATE_COMMENT.is_match(slide)
}

/// Find the first template reference in a slide
pub fn find_template(slide: &str) -> Option<Result<Directive, TemplateError>> {
    let caps = TEMPLATE_COMMENT.captures(slide)?;
    let whole = caps.get(0)?;

    let parsed = match (caps.get(1), caps.get(2)) {
        (Some(attribute), Some(name)) if !name.as_str().trim().is_empty() => Ok(Directive {
            name: name.as_str().trim().to_string(),
            attribute: attribute.as_str().to_string(),
            span: whole.range(),
        }),
        _ => Err(TemplateError::MalformedDirective {
            directive: whole.as_str().to_string(),
        }),
    };
    Some(parsed)
}

/// Names of every template a text references, in expansion order
///
/// Each attribute is removed after it is read, exactly as a splice removes it,
/// so a comment carrying several references yields all of them.
pub fn referenced_templates(text: &str) -> Result<Vec<String>, TemplateError> {
    let mut rest = text.to_string();
    let mut names = Vec::new();
    while let Some(found) = find_template(&rest) {
        let directive = found?;
        rest = rest.replace(&directive.attribute, "");
        names.push(directive.file_name());
    }
    Ok(names)
}

/// Remove empty slide marker comments
pub fn strip_empty_markers(slide: &str) -> String {
    EMPTY_SLIDE_COMMENT.replace_all(slide, "").into_owned()
}

/// Append the template extension when it is missing
pub fn with_extension(name: &str) -> String {
    if name.ends_with(TEMPLATE_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{TEMPLATE_EXTENSION}")
    }
}
