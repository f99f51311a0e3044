//! mdtree Parser
//!
//! This crate turns markdown source into a flat, markdown-it style token
//! stream, ready for [`mdtree_core::SyntaxTree::build`].
//!
//! # Overview
//!
//! Block and inline structure comes from `pulldown-cmark`'s offset event
//! stream, which [`tokenizer`] converts into open/close token pairs. The
//! `zero` preset uses a small paragraph-only tokenizer instead. After that,
//! core passes run over every `inline` token's children:
//!
//! - [`linkify`] - bare URLs and e-mail addresses become links
//! - [`typographer`] - quote remapping and typographic replacements
//!
//! Link and image destinations that fail [`validate::validate_link`] are
//! kept as their literal source text.
//!
//! # Example
//!
//! ```
//! use mdtree_config::ResolvedOptions;
//! use mdtree_core::Preset;
//! use mdtree_parser::Tokenizer;
//!
//! let tokenizer = Tokenizer::new(Preset::Default, ResolvedOptions::default());
//! let tokens = tokenizer.parse("Hello *world*");
//! let types: Vec<_> = tokens.iter().map(|t| t.ty.as_str()).collect();
//! assert_eq!(types, ["paragraph_open", "inline", "paragraph_close"]);
//! ```

pub mod inline;
pub mod lines;
pub mod linkify;
pub mod tokenizer;
pub mod typographer;
pub mod validate;
pub mod zero;

use log::debug;
use mdtree_config::ResolvedOptions;
use mdtree_core::{Preset, Token};
use pulldown_cmark::Options;

/// Markdown tokenizer configured with a preset and resolved options.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    preset: Preset,
    options: ResolvedOptions,
}

impl Tokenizer {
    pub fn new(preset: Preset, options: ResolvedOptions) -> Self {
        Self { preset, options }
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// Whether the linkify pass runs. Only the default preset carries it.
    pub fn linkify_enabled(&self) -> bool {
        self.options.linkify && self.preset.extended_rules()
    }

    /// Whether the typographer runs. Only the default preset carries it.
    pub fn typographer_enabled(&self) -> bool {
        self.options.typographer && self.preset.extended_rules()
    }

    fn pulldown_options(&self) -> Options {
        let mut options = Options::empty();
        if self.preset.extended_rules() {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.typographer_enabled() {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        options
    }

    /// Tokenize `source` into a flat token stream.
    ///
    /// Never fails: any input is valid markdown.
    pub fn parse(&self, source: &str) -> Vec<Token> {
        let source = normalize(source);
        debug!(
            "Tokenizing {} bytes with preset {}",
            source.len(),
            self.preset
        );

        let mut tokens = match self.preset {
            Preset::Zero => zero::tokenize(&source),
            _ => tokenizer::tokenize(&source, self.pulldown_options(), self.options.html),
        };

        let linkify = self.linkify_enabled();
        let typographer = self.typographer_enabled();
        if linkify || typographer {
            for token in tokens.iter_mut().filter(|t| t.ty == "inline") {
                let Some(children) = token.children.as_mut() else {
                    continue;
                };
                if linkify {
                    linkify::apply(children);
                }
                if typographer {
                    typographer::apply(children, &self.options.quotes);
                }
            }
        }

        debug!("Produced {} block tokens", tokens.len());
        tokens
    }
}

/// Normalize line endings to `\n` and replace NUL with U+FFFD.
pub fn normalize(source: &str) -> String {
    source
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\0', "\u{FFFD}")
}

/// Tokenize with a preset and resolved options in one call.
pub fn parse(source: &str, preset: Preset, options: ResolvedOptions) -> Vec<Token> {
    Tokenizer::new(preset, options).parse(source)
}
