//! Configuration types and TOML load/save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum sensible render width; anything narrower cannot fit the window
/// chrome plus a gutter.
const MIN_RENDER_WIDTH: usize = 20;

/// Per-block display flags.
///
/// These mirror the attributes a host page declares on each block markup;
/// the config values act as page-wide defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayFlags {
    /// Render a line-number gutter next to the code.
    pub show_line_numbers: bool,
    /// Render the copy affordance in the chrome.
    pub show_copy_button: bool,
    /// Render the declared language label in the chrome.
    pub show_language_label: bool,
    /// Whether the block can be collapsed at all.
    pub collapsible: bool,
    /// Whether a collapsible block starts out collapsed.
    pub start_collapsed: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            show_copy_button: true,
            show_language_label: true,
            collapsible: false,
            start_collapsed: false,
        }
    }
}

/// Search behaviour tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchTuning {
    /// Settle window for live keystroke input, in milliseconds. A search runs
    /// at most once per window.
    pub debounce_ms: u64,
    /// Queries shorter than this never run (avoids highlighting every
    /// occurrence of a single character on each keystroke).
    pub min_query_len: usize,
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
        }
    }
}

/// Rendering and discovery options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Target render width in terminal columns.
    pub width: usize,
    /// Lazy blocks initialize once they come within this many rows of the
    /// viewport.
    pub lazy_margin_rows: usize,
    /// Paint a subtle background behind code lines.
    pub code_block_background: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            lazy_margin_rows: 100,
            code_block_background: true,
        }
    }
}

/// Top-level configuration for the snippet renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page-wide display flag defaults.
    pub display: DisplayFlags,
    /// Search tuning.
    pub search: SearchTuning,
    /// Render and discovery options.
    pub render: RenderOptions,
    /// Named theme to use (host-interpreted; "dark" is the built-in default).
    pub theme: Option<String>,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults if
    /// the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path())
    }

    /// Load configuration from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path, creating parent directories
    /// as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path())
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// Semantic validation of field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.width < MIN_RENDER_WIDTH {
            return Err(ConfigError::Validation(format!(
                "render.width must be at least {MIN_RENDER_WIDTH}, got {}",
                self.render.width
            )));
        }
        if self.search.min_query_len == 0 {
            return Err(ConfigError::Validation(
                "search.min_query_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory holding codepane configuration.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("codepane")
    }

    /// Path of the configuration file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.display.show_line_numbers);
        assert!(config.display.show_copy_button);
        assert!(!config.display.start_collapsed);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.render.width, 80);
        assert_eq!(config.render.lazy_margin_rows, 100);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = Config::default();
        config.display.collapsible = true;
        config.search.debounce_ms = 150;
        config.theme = Some("light".to_string());

        config.save_to_path(&path).unwrap();
        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search]\ndebounce_ms = 50\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.search.debounce_ms, 50);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.render.width, 80);
    }

    #[test]
    fn test_validation_rejects_narrow_width() {
        let mut config = Config::default();
        config.render.width = 5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }
}
