//! Slide templates
//!
//! A slide can name a template fragment in a directive comment. The fragment
//! replaces the slide, with the slide's own text spliced in at
//! `<% content %>`. Fragments may reference further templates, and named
//! blocks in the result fill the fragment's placeholders.
//!
//! # Example
//!
//! ```text
//! <!-- .slide template="[[layouts/two-columns]]" -->
//! ::: left
//! Pros
//! :::
//! ::: right
//! Cons
//! :::
//! ```
//!
//! with `layouts/two-columns.md`:
//!
//! ```text
//! <div class="col"><% left %></div>
//! <div class="col"><% right %></div>
//! <% content %>
//! ```

mod chain;
mod directive;
mod expander;
mod loader;
mod variables;

pub use chain::ExpansionChain;
pub use directive::{
    find_template, has_template, referenced_templates, strip_empty_markers, with_extension,
    Directive, TEMPLATE_EXTENSION,
};
pub use expander::{Expander, CONTENT_PLACEHOLDER, MAX_EXPANSIONS};
pub use loader::{DirectoryLoader, FileLoader, MemoryLoader};
pub use variables::{compute_variables, named_blocks, NamedBlock, ANONYMOUS_BLOCK};
