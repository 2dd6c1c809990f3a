//! Splitting a document into slides and reassembling it
//!
//! A document is cut into slide groups by the horizontal separator and each
//! group into slides by the vertical separator. Separator text is kept
//! verbatim so that reassembly reproduces the input byte for byte when no
//! slide changes.

use regex::Regex;

use crate::config::Separators;

/// Apply `f` to every slide and rejoin with the original separator text
pub fn map_slides<F>(markdown: &str, separators: &Separators, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut output = String::with_capacity(markdown.len());
    for_each_piece(markdown, &separators.horizontal, |piece| match piece {
        Piece::Text(group) => {
            for_each_piece(group, &separators.vertical, |piece| match piece {
                Piece::Text(slide) => output.push_str(&f(slide)),
                Piece::Separator(sep) => output.push_str(sep),
            });
        }
        Piece::Separator(sep) => output.push_str(sep),
    });
    output
}

enum Piece<'a> {
    Text(&'a str),
    Separator(&'a str),
}

fn for_each_piece<'a, F>(text: &'a str, pattern: &Regex, mut f: F)
where
    F: FnMut(Piece<'a>),
{
    let mut last = 0;
    for m in pattern.find_iter(text) {
        // An empty match would split between every character
        if m.is_empty() {
            continue;
        }
        f(Piece::Text(&text[last..m.start()]));
        f(Piece::Separator(m.as_str()));
        last = m.end();
    }
    f(Piece::Text(&text[last..]));
}

/// Drop a separator that ends the document
///
/// A newline is appended first so a separator written on the last line still
/// matches. The horizontal separator is checked before the vertical one.
pub fn trim_ending(markdown: &str, separators: &Separators) -> String {
    let input = format!("{markdown}\n");

    for pattern in [&separators.horizontal, &separators.vertical] {
        if let Some(m) = pattern.find(&input) {
            let matched = m.as_str();
            if !matched.is_empty() && input.ends_with(matched) {
                if let Some(at) = input.rfind(matched) {
                    return input[..at].to_string();
                }
            }
        }
    }

    markdown.to_string()
}
