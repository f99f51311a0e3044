//! Command-line interface for mdtree.

use clap::{Parser, ValueEnum};
use mdtree_config::{ParseOptions, QuoteStyle};
use mdtree_core::Preset;
use std::path::PathBuf;

/// What to print for each input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rendered HTML
    #[default]
    Html,
    /// Indented outline of the syntax tree
    Tree,
    /// Token stream as JSON
    Tokens,
}

/// mdtree - Markdown through a markdown-it style syntax tree.
///
/// Tokenizes markdown into a markdown-it token stream, rebuilds the nesting
/// as a syntax tree and renders it to HTML.
#[derive(Parser, Debug)]
#[command(
    name = "mdtree",
    author = "mdtree Contributors",
    version,
    about = "Render Markdown through a markdown-it style syntax tree",
    after_help = "Examples:\n  \
                  cat README.md | mdtree\n  \
                  mdtree -p commonmark document.md\n  \
                  mdtree -f tree --show-text notes.md\n  \
                  mdtree -c 'preset = \"zero\"' input.md"
)]
pub struct Cli {
    /// Input files to process (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "loglevel", default_value = "warn")]
    pub log_level: String,

    /// Use a custom config file or inline TOML
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Tokenizer preset: default, commonmark or zero
    #[arg(short = 'p', long = "preset")]
    pub preset: Option<Preset>,

    /// Let raw HTML through
    #[arg(long = "html", conflicts_with = "no_html")]
    pub html: bool,

    /// Escape raw HTML
    #[arg(long = "no-html")]
    pub no_html: bool,

    /// Turn bare URLs into links
    #[arg(long = "linkify", conflicts_with = "no_linkify")]
    pub linkify: bool,

    /// Leave bare URLs as text
    #[arg(long = "no-linkify")]
    pub no_linkify: bool,

    /// Smart quotes and typographic replacements
    #[arg(long = "typographer", conflicts_with = "no_typographer")]
    pub typographer: bool,

    /// Disable smart quotes and replacements
    #[arg(long = "no-typographer")]
    pub no_typographer: bool,

    /// Disable syntax highlighting
    #[arg(long = "no-highlight")]
    pub no_highlight: bool,

    /// Render soft line breaks as <br>
    #[arg(long = "breaks")]
    pub breaks: bool,

    /// Close void elements XHTML style (<br />)
    #[arg(long = "xhtml-out")]
    pub xhtml_out: bool,

    /// CSS class prefix for fenced code languages
    #[arg(long = "lang-prefix", value_name = "PREFIX")]
    pub lang_prefix: Option<String>,

    /// Typographer quotes, four characters: double open/close, single open/close
    #[arg(long = "quotes", value_name = "CHARS")]
    pub quotes: Option<String>,

    /// Syntax highlighting theme
    #[arg(long = "theme")]
    pub theme: Option<String>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Show text content in tree output
    #[arg(long = "show-text")]
    pub show_text: bool,

    /// Show configuration paths and exit
    #[arg(long = "paths")]
    pub show_paths: bool,

    /// Write the default config file if missing, print its path and exit
    #[arg(long = "init-config")]
    pub init_config: bool,

    /// List highlighting themes and languages and exit
    #[arg(long = "list-themes")]
    pub list_themes: bool,
}

impl Cli {
    /// Check if we should read from stdin.
    pub fn should_read_stdin(&self) -> bool {
        self.files.is_empty()
    }

    /// Options set on the command line. Flags that were not given stay
    /// unset so the config file decides.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            html: switch(self.html, self.no_html),
            xhtml_out: self.xhtml_out.then_some(true),
            breaks: self.breaks.then_some(true),
            lang_prefix: self.lang_prefix.clone(),
            linkify: switch(self.linkify, self.no_linkify),
            typographer: switch(self.typographer, self.no_typographer),
            quotes: self.quotes.clone().map(QuoteStyle::Chars),
            highlighting: self.no_highlight.then_some(false),
        }
    }
}

fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Show paths information.
pub fn show_paths() {
    use mdtree_config::Config;

    let config_path = Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());

    println!("paths:");
    println!("  config                {}", config_path);
}

/// Print the highlighting themes and languages syntect knows about.
pub fn list_themes() {
    use mdtree_syntax::{aliases_for, Highlighter};

    let highlighter = Highlighter::new();

    println!("themes:");
    for theme in highlighter.themes() {
        println!("  {}", theme);
    }

    println!("languages:");
    for language in highlighter.languages() {
        let aliases = aliases_for(language);
        if aliases.is_empty() {
            println!("  {}", language);
        } else {
            println!("  {:<22}{}", language, aliases.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default() {
        let cli = Cli::parse_from(["mdtree"]);
        assert!(cli.files.is_empty());
        assert_eq!(cli.log_level, "warn");
        assert_eq!(cli.format, OutputFormat::Html);
        assert!(cli.preset.is_none());
        assert!(cli.should_read_stdin());
        assert!(!cli.list_themes);
        assert!(!cli.init_config);
        assert_eq!(cli.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_cli_parse_init_config() {
        let cli = Cli::parse_from(["mdtree", "--init-config"]);
        assert!(cli.init_config);
    }

    #[test]
    fn test_cli_parse_with_file() {
        let cli = Cli::parse_from(["mdtree", "test.md"]);
        assert_eq!(cli.files, [PathBuf::from("test.md")]);
        assert!(!cli.should_read_stdin());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::parse_from([
            "mdtree",
            "-l", "debug",
            "-p", "commonmark",
            "-f", "tree",
            "--show-text",
            "--theme", "base16-ocean.dark",
            "file.md",
        ]);
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.preset, Some(Preset::Commonmark));
        assert_eq!(cli.format, OutputFormat::Tree);
        assert!(cli.show_text);
        assert_eq!(cli.theme.as_deref(), Some("base16-ocean.dark"));
    }

    #[test]
    fn test_parse_options_overrides() {
        let cli = Cli::parse_from([
            "mdtree",
            "--no-html",
            "--linkify",
            "--no-typographer",
            "--no-highlight",
            "--breaks",
            "--xhtml-out",
            "--lang-prefix", "lang-",
            "--quotes", "«»‹›",
        ]);
        let options = cli.parse_options();
        assert_eq!(options.html, Some(false));
        assert_eq!(options.linkify, Some(true));
        assert_eq!(options.typographer, Some(false));
        assert_eq!(options.highlighting, Some(false));
        assert_eq!(options.breaks, Some(true));
        assert_eq!(options.xhtml_out, Some(true));
        assert_eq!(options.lang_prefix.as_deref(), Some("lang-"));
        assert_eq!(
            options.quotes.and_then(|q| q.to_quotes()).map(|q| q.double_open),
            Some("«".to_string())
        );
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        assert!(Cli::try_parse_from(["mdtree", "--html", "--no-html"]).is_err());
        assert!(Cli::try_parse_from(["mdtree", "-p", "gfm"]).is_err());
    }
}
