//! # Application Configuration
//!
//! File-backed settings for a typed-route service: bind address, the
//! response format the application registers its routes with, and where
//! view templates live.
//!
//! ```yaml
//! addr: "0.0.0.0:8080"
//! format: html
//! templates_dir: "templates"
//! ```
//!
//! Every key is optional; missing keys fall back to [`AppConfig::default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How an application presents its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Serialize outputs directly as JSON
    #[default]
    Json,
    /// Render outputs through view templates
    Html,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::Json => write!(f, "json"),
            ResponseFormat::Html => write!(f, "html"),
        }
    }
}

/// Error returned when a response format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFormatError(pub String);

impl fmt::Display for ParseFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown response format '{}', expected json or html", self.0)
    }
}

impl std::error::Error for ParseFormatError {}

impl FromStr for ResponseFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "html" => Ok(ResponseFormat::Html),
            other => Err(ParseFormatError(other.to_string())),
        }
    }
}

/// Service configuration loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address to bind the HTTP server to
    pub addr: String,
    /// Response format used when registering routes
    pub format: ResponseFormat,
    /// Directory holding view templates (required for `html`)
    pub templates_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            format: ResponseFormat::Json,
            templates_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// Relative `templates_dir` values are resolved against the directory
    /// containing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        if let (Some(dir), Some(parent)) = (&config.templates_dir, path.parent()) {
            if dir.is_relative() {
                config.templates_dir = Some(parent.join(dir));
            }
        }
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not match the configuration shape.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(raw)?;
        Ok(config)
    }
}
