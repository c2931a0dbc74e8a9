//! Engine configuration loaded from a TOML file and the environment

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::SearchOptions;
use crate::model::{ModifierNames, GLOBAL_SCOPE_NAME, TEXT_EDITOR_SCOPE_NAME};

/// Configuration result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Settings for parsing, conflict classification and search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the scope treated as Global when classifying conflicts
    pub global_scope_name: String,
    /// Scopes listed first in scope pickers
    pub pinned_scopes: Vec<String>,
    /// Localized modifier names used in binding text
    pub modifier_names: ModifierNames,
    pub search: SearchOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            global_scope_name: GLOBAL_SCOPE_NAME.to_string(),
            pinned_scopes: vec![
                GLOBAL_SCOPE_NAME.to_string(),
                TEXT_EDITOR_SCOPE_NAME.to_string(),
            ],
            modifier_names: ModifierNames::default(),
            search: SearchOptions::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.global_scope_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Global scope name cannot be empty".to_string(),
            ));
        }

        let names = self.modifier_names.names();
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Modifier names cannot be empty".to_string(),
                ));
            }
            if name.contains('+') || name.contains(',') {
                return Err(ConfigError::Validation(format!(
                    "Modifier name '{}' cannot contain '+' or ','",
                    name
                )));
            }
            if names[..index]
                .iter()
                .any(|other| other.eq_ignore_ascii_case(name))
            {
                return Err(ConfigError::Validation(format!(
                    "Duplicate modifier name: {}",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Loads and saves `EngineConfig`
pub struct ConfigLoader {
    config_path: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        ConfigLoader {
            config_path: path.into(),
            env_prefix: "KEYSCOPE".to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// `<config dir>/keyscope/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyscope")
            .join("config.toml")
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load from the file (if present) overlaid with environment variables
    pub fn load(&self) -> Result<EngineConfig> {
        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {}", self.config_path.display());
        Ok(config)
    }

    pub fn save(&self, config: &EngineConfig) -> Result<()> {
        config.validate()?;
        let toml = toml::to_string(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
