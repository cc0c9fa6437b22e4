//! Settings for the CLI and the viewer
//!
//! Built-in values live in `defaults/treevis.default.toml`, compiled into the
//! crate. Empty strings there mean "not set": no language selects abstract
//! display, no start category uses the grammar's own `startcat`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/treevis.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TreevisConfig {
    pub display: DisplayConfig,
    pub viewer: ViewerConfig,
    pub output: OutputConfig,
}

/// How labels and alternatives are produced
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub language: String,
    pub linearization_separator: String,
    pub start_category: String,
}

impl DisplayConfig {
    /// The configured language, if any
    pub fn language(&self) -> Option<&str> {
        non_empty(&self.language)
    }

    /// The configured start category, if any
    pub fn start_category(&self) -> Option<&str> {
        non_empty(&self.start_category)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    pub tree_width: u16,
    pub show_icons: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Builds a [`TreevisConfig`] from the embedded defaults plus any number of layers
///
/// Later layers win. The CLI adds `./treevis.toml` (optional), then `--config`
/// (required), then one override per command-line flag.
#[derive(Debug, Clone)]
pub struct Loader {
    layers: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Loader {
            layers: Config::builder().add_source(defaults),
        }
    }

    /// Add a TOML file that must exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Add a TOML file that is skipped when absent
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.layers = self.layers.add_source(file);
        self
    }

    /// Override one dotted key, e.g. `display.language`
    pub fn set_override<V>(mut self, key: &str, value: V) -> Result<Self, ConfigError>
    where
        V: Into<ValueKind>,
    {
        self.layers = self.layers.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<TreevisConfig, ConfigError> {
        self.layers.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone
pub fn load_defaults() -> Result<TreevisConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_behavior() {
        let config = load_defaults().unwrap();
        assert_eq!(config.display.language(), None);
        assert_eq!(config.display.linearization_separator, " | ");
        assert_eq!(config.display.start_category(), None);
        assert_eq!(config.viewer.tree_width, 40);
        assert!(config.viewer.show_icons);
        assert_eq!(config.output.format, "treeviz");
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Loader::new()
            .set_override("display.language", "FoodsEng")
            .and_then(|l| l.set_override("viewer.show_icons", false))
            .and_then(Loader::build)
            .unwrap();
        assert_eq!(config.display.language(), Some("FoodsEng"));
        assert!(!config.viewer.show_icons);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/nonexistent/treevis.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/treevis.toml")
            .build()
            .unwrap();
        assert_eq!(config.output.format, "treeviz");
    }
}
