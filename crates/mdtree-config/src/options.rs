//! Parse options.
//!
//! This module contains the `ParseOptions` struct which mirrors the
//! markdown-it options object, and the fully resolved form the tokenizer
//! and renderer consume.

use log::warn;
use mdtree_core::Preset;
use serde::{Deserialize, Serialize};

/// Default class prefix for fenced code blocks.
pub const DEFAULT_LANG_PREFIX: &str = "language-";

/// Default typographer quotes: double open, double close, single open,
/// single close.
pub const DEFAULT_QUOTES: &str = "\u{201c}\u{201d}\u{2018}\u{2019}";

/// Replacement characters for smart quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quotes {
    pub double_open: String,
    pub double_close: String,
    pub single_open: String,
    pub single_close: String,
}

impl Default for Quotes {
    fn default() -> Self {
        let mut chars = DEFAULT_QUOTES.chars().map(String::from);
        let mut next = || chars.next().unwrap_or_default();
        Self {
            double_open: next(),
            double_close: next(),
            single_open: next(),
            single_close: next(),
        }
    }
}

/// Quotes as written in config: either a four character string such as
/// `"«»‹›"` or a list of four strings such as `["„", "“", "‚", "‘"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteStyle {
    Chars(String),
    List(Vec<String>),
}

impl QuoteStyle {
    /// Convert to [`Quotes`], or `None` unless there are exactly four
    /// entries.
    pub fn to_quotes(&self) -> Option<Quotes> {
        let parts: Vec<String> = match self {
            QuoteStyle::Chars(s) => s.chars().map(String::from).collect(),
            QuoteStyle::List(list) => list.clone(),
        };
        let [double_open, double_close, single_open, single_close] =
            <[String; 4]>::try_from(parts).ok()?;
        Some(Quotes {
            double_open,
            double_close,
            single_open,
            single_close,
        })
    }
}

/// Tokenizer and renderer options.
///
/// Every field is optional; unset fields fall back to the preset defaults
/// when [resolved](ParseOptions::resolve). Unknown keys are ignored when
/// deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// Allow raw HTML in the source to pass through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<bool>,

    /// Close void elements with ` />`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xhtml_out: Option<bool>,

    /// Render soft line breaks as `<br>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breaks: Option<bool>,

    /// CSS class prefix for fenced code languages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_prefix: Option<String>,

    /// Turn bare URLs into links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkify: Option<bool>,

    /// Smart quotes and typographic replacements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typographer: Option<bool>,

    /// Quote characters used by the typographer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotes: Option<QuoteStyle>,

    /// Syntax-highlight fenced code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighting: Option<bool>,
}

impl ParseOptions {
    /// Merge another set of options into this one.
    ///
    /// Only the fields that are set in `other` are copied.
    pub fn merge(&mut self, other: &ParseOptions) {
        merge_field(&mut self.html, &other.html);
        merge_field(&mut self.xhtml_out, &other.xhtml_out);
        merge_field(&mut self.breaks, &other.breaks);
        merge_field(&mut self.lang_prefix, &other.lang_prefix);
        merge_field(&mut self.linkify, &other.linkify);
        merge_field(&mut self.typographer, &other.typographer);
        merge_field(&mut self.quotes, &other.quotes);
        merge_field(&mut self.highlighting, &other.highlighting);
    }

    /// Fill unset fields from the preset defaults.
    pub fn resolve(&self, preset: Preset) -> ResolvedOptions {
        let quotes = match &self.quotes {
            Some(style) => style.to_quotes().unwrap_or_else(|| {
                warn!("ignoring quotes option {:?}: expected four entries", style);
                Quotes::default()
            }),
            None => Quotes::default(),
        };

        ResolvedOptions {
            html: self.html.unwrap_or(preset.html_default()),
            xhtml_out: self.xhtml_out.unwrap_or(preset.xhtml_out_default()),
            breaks: self.breaks.unwrap_or(false),
            lang_prefix: self
                .lang_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_LANG_PREFIX.to_string()),
            linkify: self.linkify.unwrap_or(false),
            typographer: self.typographer.unwrap_or(false),
            quotes,
            highlighting: self.highlighting.unwrap_or(false),
        }
    }
}

fn merge_field<T: Clone>(target: &mut Option<T>, other: &Option<T>) {
    if let Some(value) = other {
        *target = Some(value.clone());
    }
}

/// Options with every value decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub html: bool,
    pub xhtml_out: bool,
    pub breaks: bool,
    pub lang_prefix: String,
    pub linkify: bool,
    pub typographer: bool,
    pub quotes: Quotes,
    pub highlighting: bool,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        ParseOptions::default().resolve(Preset::Default)
    }
}
