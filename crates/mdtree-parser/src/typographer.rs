//! Typographer pass.
//!
//! Dashes, ellipses and curly quotes are produced by the block tokenizer's
//! smart punctuation. This pass adds the symbol replacements and maps the
//! curly quotes onto the configured quote characters.

use mdtree_config::Quotes;
use mdtree_core::Token;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `(c)`, `(r)`, `(tm)` in any case.
static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\((c|r|tm)\)").unwrap());

/// Every `+-`, including the tail of a longer run such as `++-`.
static PLUS_MINUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+-").unwrap());

/// Rewrite the text children of one `inline` token in place.
///
/// Text inside autolinks is left alone so URLs keep their spelling.
pub fn apply(children: &mut [Token], quotes: &Quotes) {
    let remap = *quotes != Quotes::default();
    let mut autolink_depth = 0usize;

    for token in children.iter_mut() {
        match token.ty.as_str() {
            "link_open" if token.info == "auto" => autolink_depth += 1,
            "link_close" if token.info == "auto" => {
                autolink_depth = autolink_depth.saturating_sub(1)
            }
            "text" if autolink_depth == 0 => {
                let mut content = replace_symbols(&token.content);
                if remap {
                    content = remap_quotes(&content, quotes);
                }
                token.content = content;
            }
            _ => {}
        }
    }
}

/// Apply the symbol replacements to a string.
pub fn replace_symbols(text: &str) -> String {
    if !text.contains('(') && !text.contains("+-") {
        return text.to_string();
    }
    let replaced = SYMBOL_RE.replace_all(text, |caps: &Captures<'_>| {
        match caps[1].to_ascii_lowercase().as_str() {
            "c" => "\u{a9}",
            "r" => "\u{ae}",
            _ => "\u{2122}",
        }
    });
    PLUS_MINUS_RE.replace_all(&replaced, "\u{b1}").into_owned()
}

/// Map the default curly quotes onto `quotes`. A right single quote between
/// two alphanumerics is an apostrophe and stays as it is.
pub fn remap_quotes(text: &str, quotes: &Quotes) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\u{201c}' => out.push_str(&quotes.double_open),
            '\u{201d}' => out.push_str(&quotes.double_close),
            '\u{2018}' => out.push_str(&quotes.single_open),
            '\u{2019}' => {
                let prev = i.checked_sub(1).and_then(|p| chars.get(p));
                let next = chars.get(i + 1);
                let apostrophe = prev.is_some_and(|p| p.is_alphanumeric())
                    && next.is_some_and(|n| n.is_alphanumeric());
                if apostrophe {
                    out.push(c);
                } else {
                    out.push_str(&quotes.single_close);
                }
            }
            _ => out.push(c),
        }
    }

    out
}
