//! Render configuration.

use serde::{Deserialize, Serialize};

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Render configuration.
///
/// Controls presentation choices that are not part of the parse options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Syntax highlighting theme name (syntect built-ins).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl RenderConfig {
    /// The configured theme, or the default one.
    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or(DEFAULT_THEME)
    }

    /// Merge another RenderConfig into this one. Set fields win.
    pub fn merge(&mut self, other: &RenderConfig) {
        if let Some(theme) = &other.theme {
            self.theme = Some(theme.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        assert_eq!(RenderConfig::default().theme(), "InspiredGitHub");
    }

    #[test]
    fn test_merge() {
        let mut base = RenderConfig::default();
        base.merge(&RenderConfig {
            theme: Some("base16-ocean.dark".to_string()),
        });
        assert_eq!(base.theme(), "base16-ocean.dark");

        base.merge(&RenderConfig::default());
        assert_eq!(base.theme(), "base16-ocean.dark");
    }
}
