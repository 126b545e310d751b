//! Engine configuration
//!
//! Small TOML-backed configuration for the [`Engine`](crate::Engine)'s
//! directory loader. Everything has a sensible default, so a config file is
//! only needed to change the recognized template extensions.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::name::TEMPLATE_EXTENSIONS;

/// Errors that can occur when loading or parsing a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for the directory loader
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// File extensions loaded as templates (with leading dot)
    pub extensions: Vec<String>,
}

/// TOML structure for deserializing engine configs
#[derive(Deserialize)]
struct TomlConfig {
    templates: Option<TomlTemplates>,
}

#[derive(Deserialize)]
struct TomlTemplates {
    extensions: Option<Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            extensions: TEMPLATE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    /// Load a config from a TOML file:
    ///
    /// ```toml
    /// [templates]
    /// extensions = [".blade", ".tmpl"]
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a config from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(templates) = parsed.templates {
            if let Some(extensions) = templates.extensions {
                config.extensions = extensions;
            }
        }
        Ok(config)
    }

    /// Whether a file name carries one of the configured extensions
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext))
    }
}
