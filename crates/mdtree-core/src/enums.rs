//! Core enums shared between the tokenizer, config and renderer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named tokenizer preset.
///
/// A preset fixes the baseline grammar: which block and inline rules are
/// active, and the default values of the parse options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CommonMark plus tables and strikethrough
    #[default]
    Default,
    /// Strict CommonMark
    Commonmark,
    /// Paragraphs, text and line breaks only
    Zero,
}

impl Preset {
    /// All presets, in the order they are offered to users.
    pub const ALL: [Preset; 3] = [Preset::Default, Preset::Commonmark, Preset::Zero];

    /// Whether raw HTML passes through unless overridden.
    pub fn html_default(self) -> bool {
        matches!(self, Preset::Commonmark)
    }

    /// Whether void elements self-close unless overridden.
    pub fn xhtml_out_default(self) -> bool {
        matches!(self, Preset::Commonmark)
    }

    /// Whether tables, strikethrough, linkify and the typographer are
    /// available. The other presets ignore those options.
    pub fn extended_rules(self) -> bool {
        matches!(self, Preset::Default)
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preset::Default => write!(f, "default"),
            Preset::Commonmark => write!(f, "commonmark"),
            Preset::Zero => write!(f, "zero"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Preset::Default),
            "commonmark" => Ok(Preset::Commonmark),
            "zero" => Ok(Preset::Zero),
            other => Err(format!(
                "unknown preset `{}` (expected default, commonmark or zero)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_display() {
        assert_eq!(Preset::Default.to_string(), "default");
        assert_eq!(Preset::Commonmark.to_string(), "commonmark");
        assert_eq!(Preset::Zero.to_string(), "zero");
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("default".parse::<Preset>(), Ok(Preset::Default));
        assert_eq!(" CommonMark ".parse::<Preset>(), Ok(Preset::Commonmark));
        assert_eq!("zero".parse::<Preset>(), Ok(Preset::Zero));
        assert!("gfm".parse::<Preset>().is_err());
    }

    #[test]
    fn test_preset_defaults() {
        assert!(!Preset::Default.html_default());
        assert!(Preset::Commonmark.html_default());
        assert!(Preset::Commonmark.xhtml_out_default());
        assert!(Preset::Default.extended_rules());
        assert!(!Preset::Commonmark.extended_rules());
        assert!(!Preset::Zero.extended_rules());
    }
}
