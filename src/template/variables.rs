//! Named blocks and placeholder substitution
//!
//! A named block is a fenced region whose content can be referenced from
//! elsewhere in the same slide:
//!
//! ```text
//! ::: footer
//! Contact us
//! :::
//!
//! <% footer %>      required: replaced by the block
//! <%? aside %>      optional: removed when no `aside` block exists
//! ```
//!
//! Block matching is flat. The first `:::` after a block header closes it,
//! so blocks cannot nest. Blocks are read from the slide as given; a block
//! whose body uses another block's placeholder is left in place once that
//! placeholder has been filled.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::footnote::Footnotes;

/// Reserved name of the anonymous wrapper produced by substitution
pub const ANONYMOUS_BLOCK: &str = "block";

static NAMED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s):::\s([^\n]+)\s*(.*?:::[^\n]*)").expect("named block pattern is valid")
});

static OPTIONAL_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<%\?.*%>").expect("optional placeholder pattern is valid"));

/// A named block found in a slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlock<'a> {
    /// Trimmed block name
    pub name: &'a str,
    /// Everything after the header up to and including the closing line
    pub content: &'a str,
    /// The raw block text as written
    pub raw: &'a str,
}

impl NamedBlock<'_> {
    /// Content wrapped as an anonymous block
    pub fn value(&self) -> String {
        format!("::: {ANONYMOUS_BLOCK}\n{}", self.content)
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_BLOCK
    }
}

/// Iterate over the named blocks of a slide, anonymous wrappers included
pub fn named_blocks(slide: &str) -> impl Iterator<Item = NamedBlock<'_>> {
    NAMED_BLOCK.captures_iter(slide).filter_map(|caps| {
        let raw = caps.get(0)?.as_str();
        let name = caps.get(1)?.as_str().trim();
        let content = caps.get(2)?.as_str();
        Some(NamedBlock { name, content, raw })
    })
}

fn required_placeholder(name: &str) -> String {
    format!("<% {name} %>")
}

fn optional_placeholder(name: &str) -> String {
    format!("<%? {name} %>")
}

/// Resolve named blocks and placeholders in a slide
///
/// Each non-anonymous block is removed from the slide and its wrapped content
/// replaces `<% name %>`. An optional `<%? name %>` receives the content in
/// front of it. Footnotes are renumbered, then every remaining optional
/// placeholder is dropped.
pub fn compute_variables(slide: &str, footnotes: &dyn Footnotes) -> String {
    let mut result = slide.to_string();

    for block in named_blocks(slide) {
        if block.is_anonymous() {
            continue;
        }

        let value = block.value();
        let optional = optional_placeholder(block.name);
        result = result.replace(&optional, &format!("{value}\n{optional}"));
        result = result.replace(&required_placeholder(block.name), &value);
        result = result.replace(block.raw, "");
    }

    let result = footnotes.renumber(&result);
    OPTIONAL_PLACEHOLDER.replace_all(&result, "").into_owned()
}
