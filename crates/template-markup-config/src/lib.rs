use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use template_markup_engine::parsing::inline::kinds::Conditional;
use template_markup_engine::{DEFAULT_CONDITION, MarkupOptions};
use thiserror::Error;

/// Blockquote markers the storage form may use.
pub const QUOTE_MARKERS: [char; 2] = ['^', '>'];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file at {config_path}: {reason}")]
    ConfigInvalid { config_path: PathBuf, reason: String },
}

fn default_condition() -> String {
    DEFAULT_CONDITION.to_string()
}

fn default_quote_marker() -> char {
    '^'
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub templates_path: PathBuf,
    /// Condition written when a conditional is left without one.
    #[serde(default = "default_condition")]
    pub default_condition: String,
    #[serde(default = "default_quote_marker")]
    pub quote_marker: char,
}

impl Config {
    pub fn new(templates_path: PathBuf) -> Self {
        Self {
            templates_path,
            default_condition: default_condition(),
            quote_marker: default_quote_marker(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate().map_err(|reason| ConfigError::ConfigInvalid {
            config_path: config_path.to_path_buf(),
            reason,
        })?;

        // Expand shell variables and tilde in the templates path
        config.templates_path =
            Self::expand_path(&config.templates_path).unwrap_or(config.templates_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/template-markup");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Engine options carried by this config.
    pub fn markup_options(&self) -> MarkupOptions {
        MarkupOptions {
            default_condition: self.default_condition.clone(),
            quote_marker: self.quote_marker,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !Conditional::is_valid_condition(&self.default_condition) {
            return Err(format!(
                "default_condition {:?} is not a valid condition",
                self.default_condition
            ));
        }
        if !QUOTE_MARKERS.contains(&self.quote_marker) {
            return Err(format!(
                "quote_marker must be one of {QUOTE_MARKERS:?}, got {:?}",
                self.quote_marker
            ));
        }
        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
