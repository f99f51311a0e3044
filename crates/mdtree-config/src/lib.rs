//! mdtree Config
//!
//! This crate handles configuration loading and management
//! for mdtree, supporting TOML configuration files.
//!
//! # Overview
//!
//! Configuration is loaded from platform-specific locations:
//! - Linux: `~/.config/mdtree/config.toml`
//! - macOS: `~/Library/Application Support/mdtree/config.toml`
//! - Windows: `%APPDATA%\mdtree\config.toml`
//!
//! # Example
//!
//! ```no_run
//! use mdtree_config::Config;
//!
//! // Load config with defaults
//! let config = Config::load().unwrap();
//!
//! // Or load with an override file or inline TOML
//! let config = Config::load_with_override(Some("./custom.toml")).unwrap();
//! let config = Config::load_with_override(Some("preset = \"zero\"")).unwrap();
//! ```

mod options;
mod render;

pub use options::{ParseOptions, QuoteStyle, Quotes, ResolvedOptions, DEFAULT_LANG_PREFIX, DEFAULT_QUOTES};
pub use render::{RenderConfig, DEFAULT_THEME};

use log::{debug, warn};
use mdtree_core::{MdtreeError, Preset, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default TOML configuration string.
///
/// These are the demonstrator defaults: bare URLs become links, quotes are
/// curled and fences are highlighted, while raw HTML stays escaped.
const DEFAULT_TOML: &str = r#"preset = "default"

[options]
html         = false
linkify      = true
typographer  = true
highlighting = true

[render]
theme = "InspiredGitHub"
"#;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tokenizer preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,

    /// Parse options passed through to the tokenizer and renderer
    #[serde(default)]
    pub options: ParseOptions,

    /// Render configuration
    #[serde(default)]
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        // Parse the default TOML to ensure consistency
        toml::from_str(DEFAULT_TOML).expect("Default TOML should be valid")
    }
}

impl Config {
    /// Returns the default TOML configuration string.
    ///
    /// # Example
    ///
    /// ```
    /// use mdtree_config::Config;
    /// let toml = Config::default_toml();
    /// assert!(toml.contains("[options]"));
    /// assert!(toml.contains("[render]"));
    /// ```
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }

    /// The configured preset, or [`Preset::Default`].
    pub fn preset(&self) -> Preset {
        self.preset.unwrap_or_default()
    }

    /// Options with preset defaults filled in.
    pub fn resolved_options(&self) -> ResolvedOptions {
        self.options.resolve(self.preset())
    }

    /// Returns the platform-specific configuration file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns the platform-specific configuration directory.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mdtree")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Ensures the config file exists, creating it with defaults if not.
    ///
    /// # Returns
    ///
    /// The path to the config file.
    pub fn ensure_config_file() -> Result<PathBuf> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| MdtreeError::Config("Could not determine config directory".into()))?;
        Self::ensure_config_file_in(&config_dir)
    }

    /// Like [`Config::ensure_config_file`], inside `config_dir`. An existing
    /// file is left untouched.
    pub fn ensure_config_file_in(config_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(config_dir)?;

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            debug!("Writing default config to {}", config_path.display());
            std::fs::write(&config_path, DEFAULT_TOML)?;
        }

        Ok(config_path)
    }

    /// Load configuration from the default platform-specific path.
    ///
    /// If no config file exists, returns the default configuration.
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                debug!("Loading config from {}", config_path.display());
                let mut config = Self::default();
                config.merge(&Self::load_from(&config_path)?);
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    ///
    /// Only the values present in the file are set; everything else is left
    /// unset.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| MdtreeError::Config(format!("Parse error in {}: {}", path.display(), e)))
    }

    /// Parse a TOML string. Missing keys stay unset.
    pub fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| MdtreeError::Config(format!("Parse error: {}", e)))
    }

    /// Load configuration with an optional override file or string.
    ///
    /// 1. Load the base config from the default location. A file that fails
    ///    to load is logged and replaced by the defaults.
    /// 2. If an override is provided:
    ///    - If it's a path to an existing file, load and merge it
    ///    - Otherwise, treat it as a TOML string and merge it
    ///
    /// An override that fails to load is an error.
    pub fn load_with_override(override_config: Option<&str>) -> Result<Self> {
        Self::layered(Self::load(), override_config)
    }

    fn layered(base: Result<Self>, override_config: Option<&str>) -> Result<Self> {
        let mut config = base.unwrap_or_else(|e| {
            warn!("Ignoring config file: {}", e);
            Self::default()
        });

        if let Some(override_str) = override_config {
            let override_path = Path::new(override_str);

            let override_config = if override_path.exists() {
                debug!("Merging config from file: {}", override_path.display());
                Self::load_from(override_path)?
            } else {
                debug!("Merging inline config");
                Self::parse(override_str)?
            };

            config.merge(&override_config);
        }

        Ok(config)
    }

    /// Merge another config into this one.
    ///
    /// Values set in `other` take precedence over values in `self`.
    ///
    /// # Example
    ///
    /// ```
    /// use mdtree_config::Config;
    ///
    /// let mut base = Config::default();
    /// let override_config = Config::parse(r#"
    ///     [options]
    ///     linkify = false
    /// "#).unwrap();
    ///
    /// base.merge(&override_config);
    /// assert_eq!(base.options.linkify, Some(false));
    /// assert_eq!(base.options.typographer, Some(true));
    /// ```
    pub fn merge(&mut self, other: &Config) {
        if other.preset.is_some() {
            self.preset = other.preset;
        }
        self.options.merge(&other.options);
        self.render.merge(&other.render);
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| MdtreeError::Config(format!("Serialization error: {}", e)))?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}
