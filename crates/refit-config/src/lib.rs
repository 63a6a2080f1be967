//! Configuration management for refit.
//!
//! Parses `refit.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the fallback output format.
    pub default_format: Option<String>,
    /// Override `<q>` rendering of double quotes.
    pub html_q_tags: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "refit.toml";

/// Format used when neither the document nor the config picks one.
const DEFAULT_FORMAT: &str = "html";

/// Bullet markers accepted by the markdown backend.
const BULLET_MARKERS: [char; 3] = ['-', '*', '+'];

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output selection.
    pub output: OutputConfig,
    /// Backend writer options.
    pub writer: WriterConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when document metadata has no `custom_writer_format`.
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: DEFAULT_FORMAT.to_owned(),
        }
    }
}

/// Options passed through to every format backend.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Render double quotes as `<q>` elements in HTML.
    pub html_q_tags: bool,
    /// Markdown bullet list marker.
    pub bullet_marker: char,
    /// Class of the container holding collected footnotes.
    pub footnotes_class: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            html_q_tags: false,
            bullet_marker: '-',
            footnotes_class: "footnotes".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `refit.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(default_format) = &settings.default_format {
            self.output.default_format.clone_from(default_format);
        }
        if let Some(html_q_tags) = settings.html_q_tags {
            self.writer.html_q_tags = html_q_tags;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.output.default_format, "output.default_format")?;
        self.validate_writer()?;
        Ok(())
    }

    /// Validate writer configuration.
    fn validate_writer(&self) -> Result<(), ConfigError> {
        if !BULLET_MARKERS.contains(&self.writer.bullet_marker) {
            return Err(ConfigError::Validation(format!(
                "writer.bullet_marker must be one of '-', '*' or '+', got {:?}",
                self.writer.bullet_marker
            )));
        }
        require_non_empty(&self.writer.footnotes_class, "writer.footnotes_class")?;
        if self.writer.footnotes_class.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "writer.footnotes_class must be a single class name".to_owned(),
            ));
        }
        Ok(())
    }
}
