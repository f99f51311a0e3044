//! mdtree Syntax
//!
//! This crate provides syntax highlighting for fenced code blocks using
//! the syntect library, producing HTML with inline styles.
//!
//! # Features
//!
//! - **Language aliases** - Map fence names (py, js, sh) to syntect syntax definitions
//! - **Line-by-line state** - Multi-line tokens such as block comments stay highlighted
//! - **Plain text fallback** - Unknown languages are escaped, not rejected
//!
//! # Example
//!
//! ```
//! use mdtree_syntax::Highlighter;
//!
//! let highlighter = Highlighter::new();
//! let html = highlighter.highlight_html("fn main() {}\n", "rust").unwrap();
//! assert!(html.contains("<span"));
//! ```

mod languages;

pub use languages::{aliases_for, fence_language, language_alias, LANGUAGE_ALIASES};

use log::{debug, warn};
use mdtree_config::DEFAULT_THEME;
use mdtree_core::{MdtreeError, Result};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Syntax highlighter for fenced code.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_names: Vec<String>,
    theme_name: String,
    theme: Theme,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("theme_name", &self.theme_name)
            .finish()
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Create a highlighter with the default theme (InspiredGitHub).
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Create a highlighter with a syntect built-in theme, e.g.
    /// "InspiredGitHub", "base16-ocean.dark" or "Solarized (light)".
    ///
    /// An unknown theme name logs a warning and falls back to the default.
    pub fn with_theme(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let mut theme_names: Vec<String> = theme_set.themes.keys().cloned().collect();
        theme_names.sort();

        let (theme_name, theme) = match theme_set.themes.remove(theme_name) {
            Some(theme) => (theme_name.to_string(), theme),
            None => {
                warn!(
                    "unknown theme `{}`, falling back to `{}`",
                    theme_name, DEFAULT_THEME
                );
                let theme = theme_set.themes.remove(DEFAULT_THEME).unwrap_or_default();
                (DEFAULT_THEME.to_string(), theme)
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_names,
            theme_name,
            theme,
        }
    }

    /// Get the current theme name.
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Find the syntax definition for a fence language.
    ///
    /// Aliases are resolved first, then syntect's own name, token and
    /// extension lookups are tried.
    pub fn syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        let canonical = language_alias(language);

        self.syntax_set
            .find_syntax_by_name(canonical)
            .or_else(|| self.syntax_set.find_syntax_by_token(canonical))
            .or_else(|| self.syntax_set.find_syntax_by_extension(canonical))
            .or_else(|| self.syntax_set.find_syntax_by_token(language))
    }

    /// Highlight `code` as HTML `<span style=…>` runs, without the
    /// surrounding `<pre>`.
    ///
    /// Unknown languages are highlighted as plain text, which only escapes
    /// the code.
    pub fn highlight_html(&self, code: &str, language: &str) -> Result<String> {
        let syntax = match self.syntax_for_language(language) {
            Some(syntax) => syntax,
            None => {
                debug!("no syntax for `{}`, using plain text", language);
                self.syntax_set.find_syntax_plain_text()
            }
        };

        let mut lines = HighlightLines::new(syntax, &self.theme);
        let mut output = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let ranges = lines
                .highlight_line(line, &self.syntax_set)
                .map_err(|e| MdtreeError::Highlight(e.to_string()))?;
            let html = styled_line_to_highlighted_html(&ranges, IncludeBackground::No)
                .map_err(|e| MdtreeError::Highlight(e.to_string()))?;
            output.push_str(&html);
        }

        Ok(output)
    }

    /// CSS for the code block background, e.g. `background-color:#ffffff;`.
    pub fn background_style(&self) -> Option<String> {
        self.theme.settings.background.map(|c| {
            format!("background-color:#{:02x}{:02x}{:02x};", c.r, c.g, c.b)
        })
    }

    /// List available theme names, sorted.
    pub fn themes(&self) -> Vec<&str> {
        self.theme_names.iter().map(String::as_str).collect()
    }

    /// List available language names.
    pub fn languages(&self) -> Vec<&str> {
        self.syntax_set
            .syntaxes()
            .iter()
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Check if a theme exists.
    pub fn has_theme(&self, name: &str) -> bool {
        self.theme_names.iter().any(|t| t == name)
    }

    /// Check if a language is supported.
    pub fn has_language(&self, name: &str) -> bool {
        self.syntax_for_language(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_highlighter() {
        let h = Highlighter::new();
        assert_eq!(h.theme_name(), "InspiredGitHub");
    }

    #[test]
    fn test_with_theme() {
        let h = Highlighter::with_theme("Solarized (dark)");
        assert_eq!(h.theme_name(), "Solarized (dark)");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let h = Highlighter::with_theme("no-such-theme");
        assert_eq!(h.theme_name(), DEFAULT_THEME);
    }

    #[test]
    fn test_syntax_for_language() {
        let h = Highlighter::new();

        assert!(h.syntax_for_language("Rust").is_some());
        assert!(h.syntax_for_language("python").is_some());
        assert!(h.syntax_for_language("py").is_some());
        assert!(h.syntax_for_language("js").is_some());
        assert!(h.syntax_for_language("sh").is_some());
        assert!(h.syntax_for_language("cpp").is_some());
        assert!(h.syntax_for_language("unknown-lang-xyz").is_none());
    }

    #[test]
    fn test_highlight_html() {
        let h = Highlighter::new();
        let html = h
            .highlight_html("fn main() {\n    println!(\"Hello\");\n}\n", "rust")
            .unwrap();

        assert!(html.contains("<span style=\""));
        assert!(html.contains("main"));
        assert!(html.contains("&quot;Hello&quot;"));
        assert!(!html.contains("<pre"));
    }

    #[test]
    fn test_plain_text_fallback_escapes() {
        let h = Highlighter::new();
        let html = h.highlight_html("a < b && c\n", "unknown-lang-xyz").unwrap();
        assert!(html.contains("a &lt; b &amp;&amp; c"));
    }

    #[test]
    fn test_multiline_comment() {
        let h = Highlighter::new();
        let html = h
            .highlight_html("/* one\n   two */\nlet x = 1;\n", "rust")
            .unwrap();
        assert!(html.contains("two"));
        assert!(html.contains("let"));
    }

    #[test]
    fn test_background_style() {
        let h = Highlighter::new();
        let style = h.background_style().unwrap();
        assert!(style.starts_with("background-color:#"));
        assert!(style.ends_with(';'));
    }

    #[test]
    fn test_themes_and_languages() {
        let h = Highlighter::new();
        assert!(h.themes().contains(&"base16-ocean.dark"));
        assert!(h.has_theme("InspiredGitHub"));
        assert!(!h.has_theme("nonexistent-theme"));
        assert!(h.languages().contains(&"Rust"));
        assert!(h.has_language("py"));
    }
}
