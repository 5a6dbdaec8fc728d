//! Configuration loading and validation.
//!
//! [`ExiftractConfig`] can be created programmatically, deserialized from
//! TOML or JSON files, or taken as [`Default`]. All loaders run
//! [`ExiftractConfig::validate`] before handing the config back.

use crate::error::{ExiftractError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default timeout for one ExifTool invocation (90 seconds).
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 90;

/// Default maximum length of a stored feature value, in characters.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 1000;

/// Default maximum artifact size processed at all (200 MiB).
pub const DEFAULT_MAX_CONTENT_SIZE: u64 = 200 * 1024 * 1024;

/// Extraction configuration.
///
/// # Example
///
/// ```rust
/// use exiftract::ExiftractConfig;
///
/// let config = ExiftractConfig {
///     timeout_seconds: 30,
///     ..ExiftractConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExiftractConfig {
    /// Upper bound on one ExifTool invocation, in seconds. A run that
    /// exceeds this is killed and reported as a hard failure.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Textual feature values longer than this many characters are either
    /// truncated (and flagged) or dropped, depending on the field.
    #[serde(default = "default_max_value_length")]
    pub max_value_length: usize,

    /// Artifacts larger than this many bytes are not processed at all.
    #[serde(default = "default_max_content_size")]
    pub max_content_size: u64,

    /// Explicit path to the ExifTool executable. When unset, the
    /// `EXIFTRACT_EXIFTOOL_PATH` environment variable is consulted, then
    /// `PATH` is scanned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exiftool_path: Option<PathBuf>,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_max_value_length() -> usize {
    DEFAULT_MAX_VALUE_LENGTH
}

fn default_max_content_size() -> u64 {
    DEFAULT_MAX_CONTENT_SIZE
}

impl Default for ExiftractConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            exiftool_path: None,
        }
    }
}

impl ExiftractConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ExiftractError::validation_with_source(
                format!("Invalid TOML config at {}", path.display()),
                e,
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ExiftractError::validation_with_source(
                format!("Invalid JSON config at {}", path.display()),
                e,
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, dispatching on the extension
    /// (`.toml` or `.json`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            other => Err(ExiftractError::validation(format!(
                "Unsupported config extension {:?} for {} (expected .toml or .json)",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Check invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(ExiftractError::validation("timeout_seconds must be greater than 0"));
        }
        if self.max_value_length == 0 {
            return Err(ExiftractError::validation("max_value_length must be greater than 0"));
        }
        if self.max_content_size == 0 {
            return Err(ExiftractError::validation("max_content_size must be greater than 0"));
        }
        Ok(())
    }
}
