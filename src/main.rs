//! mdtree - Render Markdown through a markdown-it style syntax tree.
//!
//! This binary provides the CLI interface to the mdtree crates: it reads
//! markdown from files or stdin and prints HTML, the syntax tree outline or
//! the raw token stream.

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, OutputFormat};
use log::{debug, error, info, warn, LevelFilter};
use std::io::{self, Read, Write};

use mdtree_config::{Config, ParseOptions};
use mdtree_core::{MdtreeError, Preset, Result, SyntaxTree};
use mdtree_parser::Tokenizer;
use mdtree_render::render_markdown;

fn main() {
    let cli = <Cli as ClapParser>::parse();

    // Handle --paths flag
    if cli.show_paths {
        cli::show_paths();
        return;
    }

    if cli.list_themes {
        cli::list_themes();
        return;
    }

    if cli.init_config {
        match Config::ensure_config_file() {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Set up logging
    setup_logging(&cli.log_level);
    info!("mdtree v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Set up logging based on the log level argument.
fn setup_logging(level: &str) {
    env_logger::Builder::new()
        .filter_level(level_filter(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    }
}

/// Everything needed to process one input, after config and flags are
/// merged.
#[derive(Debug, Clone)]
struct Settings {
    preset: Preset,
    options: ParseOptions,
    theme: String,
    format: OutputFormat,
    show_text: bool,
}

/// Main application logic.
fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let settings = settings(&config, cli);
    debug!("Effective settings: {:?}", settings);

    let mut stdout = io::stdout().lock();
    if cli.should_read_stdin() {
        info!("Reading from stdin");
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        stdout.write_all(process(&source, &settings)?.as_bytes())?;
    } else {
        for path in &cli.files {
            info!("Processing file: {}", path.display());
            let source = std::fs::read_to_string(path)?;
            stdout.write_all(process(&source, &settings)?.as_bytes())?;
        }
    }

    stdout.flush()?;
    Ok(())
}

/// Load configuration with optional overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    Config::load_with_override(cli.config.as_deref())
}

/// Command-line flags take precedence over the config.
fn settings(config: &Config, cli: &Cli) -> Settings {
    let mut options = config.options.clone();
    options.merge(&cli.parse_options());

    Settings {
        preset: cli.preset.unwrap_or(config.preset()),
        options,
        theme: cli
            .theme
            .clone()
            .unwrap_or_else(|| config.render.theme().to_string()),
        format: cli.format,
        show_text: cli.show_text,
    }
}

/// Produce the output for one markdown source.
fn process(source: &str, settings: &Settings) -> Result<String> {
    match settings.format {
        OutputFormat::Html => {
            let rendered = render_markdown(
                source,
                settings.preset,
                &settings.options,
                &settings.theme,
            )?;
            for diagnostic in &rendered.diagnostics {
                warn!("{}", diagnostic);
            }
            Ok(rendered.html)
        }
        OutputFormat::Tree => {
            let tree = SyntaxTree::build(tokenize(source, settings))?;
            let mut outline = tree.root().pretty(2, settings.show_text);
            outline.push('\n');
            Ok(outline)
        }
        OutputFormat::Tokens => {
            let tokens = tokenize(source, settings);
            let mut json = serde_json::to_string_pretty(&tokens)
                .map_err(|e| MdtreeError::Parse(format!("Token serialization failed: {}", e)))?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn tokenize(source: &str, settings: &Settings) -> Vec<mdtree_core::Token> {
    let options = settings.options.resolve(settings.preset);
    Tokenizer::new(settings.preset, options).parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for(args: &[&str]) -> Settings {
        let cli = Cli::parse_from(args);
        settings(&Config::default(), &cli)
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("TRACE"), LevelFilter::Trace);
        assert_eq!(level_filter("error"), LevelFilter::Error);
        assert_eq!(level_filter("bogus"), LevelFilter::Warn);
    }

    #[test]
    fn test_settings_defaults_from_config() {
        let settings = settings_for(&["mdtree"]);
        assert_eq!(settings.preset, Preset::Default);
        assert_eq!(settings.options.linkify, Some(true));
        assert_eq!(settings.options.highlighting, Some(true));
        assert_eq!(settings.theme, "InspiredGitHub");
    }

    #[test]
    fn test_settings_flags_override_config() {
        let settings = settings_for(&[
            "mdtree",
            "-p", "zero",
            "--no-linkify",
            "--no-highlight",
            "--theme", "base16-ocean.dark",
        ]);
        assert_eq!(settings.preset, Preset::Zero);
        assert_eq!(settings.options.linkify, Some(false));
        assert_eq!(settings.options.highlighting, Some(false));
        assert_eq!(settings.options.typographer, Some(true));
        assert_eq!(settings.theme, "base16-ocean.dark");
    }

    #[test]
    fn test_process_html() {
        let settings = settings_for(&["mdtree", "--no-highlight"]);
        let html = process("# Hi\n", &settings).unwrap();
        assert_eq!(html, "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_process_tree() {
        let settings = settings_for(&["mdtree", "-f", "tree", "--show-text"]);
        let outline = process("Hi\n", &settings).unwrap();
        assert_eq!(outline, "<root>\n  <paragraph>\n    <inline>\n      <text>\n        Hi\n");
    }

    #[test]
    fn test_process_tokens() {
        let settings = settings_for(&["mdtree", "-f", "tokens"]);
        let json = process("Hi\n", &settings).unwrap();
        let tokens: Vec<mdtree_core::Token> = serde_json::from_str(&json).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].ty, "paragraph_open");
    }

    #[test]
    fn test_load_inline_config() {
        let cli = Cli::parse_from(["mdtree", "-c", "preset = \"commonmark\""]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.preset(), Preset::Commonmark);

        let cli = Cli::parse_from(["mdtree", "-c", "preset = ["]);
        assert!(load_config(&cli).is_err());
    }
}
