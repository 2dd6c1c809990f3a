//! Footnote renumbering
//!
//! Called once per expanded slide, after placeholder substitution. Templates
//! and named blocks can bring footnotes from several files into one slide, so
//! labels are renumbered to a dense `1..n` sequence.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FOOTNOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\^([^\]\s]+)\](:)?").expect("footnote pattern is valid"));

/// Renumbers footnote markers in a slide
pub trait Footnotes {
    fn renumber(&self, text: &str) -> String;
}

/// Leaves footnotes as written
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepFootnotes;

impl Footnotes for KeepFootnotes {
    fn renumber(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Numbers footnotes in order of first reference
///
/// A definition (`[^label]: text`) takes the number of its label. Definitions
/// that are never referenced are numbered after all referenced ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialFootnotes;

impl Footnotes for SequentialFootnotes {
    fn renumber(&self, text: &str) -> String {
        let mut numbers: HashMap<&str, usize> = HashMap::new();

        let markers: Vec<(&str, bool)> = FOOTNOTE
            .captures_iter(text)
            .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2).is_some())))
            .collect();

        // references first, then orphan definitions
        for is_definition in [false, true] {
            for (label, _) in markers.iter().filter(|(_, d)| *d == is_definition) {
                let next = numbers.len() + 1;
                numbers.entry(*label).or_insert(next);
            }
        }

        if numbers.is_empty() {
            return text.to_string();
        }

        FOOTNOTE
            .replace_all(text, |caps: &Captures| {
                let label = &caps[1];
                let colon = if caps.get(2).is_some() { ":" } else { "" };
                match numbers.get(label) {
                    Some(n) => format!("[^{n}]{colon}"),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
