//! Weft configuration file handling

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::id::DEFAULT_ID_PREFIX;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`WeftConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is not usable
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level Weft configuration (weft.toml)
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeftConfig {
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub holder: HolderConfig,
}

/// Identity allocation
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct IdConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

/// Rendering defaults
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Replace the holder element (true) or only its content (false)
    #[serde(default = "default_true")]
    pub replace: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { replace: true }
    }
}

/// Holder attribute scanning
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HolderConfig {
    /// Attribute prefix, e.g. `data-comp` for `data-comp-name`
    #[serde(default = "default_attribute_prefix")]
    pub attribute_prefix: String,
    /// Type used when a holder does not name one
    #[serde(default = "default_fallback_type")]
    pub fallback_type: String,
}

fn default_attribute_prefix() -> String {
    "data-comp".to_string()
}

fn default_fallback_type() -> String {
    "Component".to_string()
}

impl Default for HolderConfig {
    fn default() -> Self {
        Self {
            attribute_prefix: default_attribute_prefix(),
            fallback_type: default_fallback_type(),
        }
    }
}

impl WeftConfig {
    /// Load configuration from a directory (looks for weft.toml) or a file
    pub fn load_from_dir(path: &Path) -> Result<Self, ConfigError> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join("weft.toml")
        };

        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;

        tracing::debug!(path = %config_path.display(), "loading weft config");
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: WeftConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ids.prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("ids.prefix must not be empty".into()));
        }
        if self.holder.attribute_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "holder.attribute_prefix must not be empty".into(),
            ));
        }
        if self.holder.fallback_type.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "holder.fallback_type must not be empty".into(),
            ));
        }
        Ok(())
    }
}
