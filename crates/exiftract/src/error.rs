//! Error types for exiftract.
//!
//! All fallible operations return [`Result`], built on [`ExiftractError`].
//! The philosophy follows the usual split:
//!
//! - **System errors bubble up unchanged**: `ExiftractError::Io` wraps
//!   `std::io::Error` and is never swallowed or rewrapped. A missing file or
//!   a permission failure must reach the caller as what it is.
//! - **Application errors carry context**: subprocess failures, malformed
//!   tool output and invalid configuration are wrapped with a message and,
//!   where available, the underlying source error.
//!
//! Note that a non-zero ExifTool exit is usually *not* an error at this
//! level: the classifier turns most of those into an
//! [`ExtractionOutcome`](crate::types::ExtractionOutcome) with an OPT_OUT,
//! MALFORMED or ERROR label. `ExiftractError` is reserved for failures of the
//! machinery itself (spawn failures, timeouts, undecodable output, contract
//! violations such as an unparseable integer field).

use thiserror::Error;

/// Result type alias using [`ExiftractError`].
pub type Result<T> = std::result::Result<T, ExiftractError>;

/// Main error type for all exiftract operations.
#[derive(Debug, Error)]
pub enum ExiftractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Subprocess error: {message}")]
    Subprocess {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("ExifTool invocation timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ExiftractError {
    fn from(err: serde_json::Error) -> Self {
        ExiftractError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl ExiftractError {
    /// Create a Serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error with source
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Subprocess error
    pub fn subprocess<S: Into<String>>(message: S) -> Self {
        Self::Subprocess {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Subprocess error with source
    pub fn subprocess_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Subprocess {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExiftractError = io_err.into();
        assert!(matches!(err, ExiftractError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_validation_error() {
        let err = ExiftractError::validation("bad timeout");
        assert_eq!(err.to_string(), "Validation error: bad timeout");
    }

    #[test]
    fn test_validation_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad param");
        let err = ExiftractError::validation_with_source("bad timeout", source);
        assert_eq!(err.to_string(), "Validation error: bad timeout");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_subprocess_error() {
        let err = ExiftractError::subprocess("spawn failed");
        assert_eq!(err.to_string(), "Subprocess error: spawn failed");
    }

    #[test]
    fn test_timeout_error_display() {
        let err = ExiftractError::Timeout { timeout_seconds: 90 };
        assert_eq!(err.to_string(), "ExifTool invocation timed out after 90 seconds");
    }

    #[test]
    fn test_missing_dependency_error() {
        let err = ExiftractError::MissingDependency("exiftool not found".to_string());
        assert_eq!(err.to_string(), "Missing dependency: exiftool not found");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ExiftractError = json_err.into();
        assert!(matches!(err, ExiftractError::Serialization { .. }));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_io_error_bubbles_unchanged() {
        fn read_file() -> Result<String> {
            let content = std::fs::read_to_string("/nonexistent/exiftract-test.bin")?;
            Ok(content)
        }

        let result = read_file();
        assert!(matches!(result.unwrap_err(), ExiftractError::Io(_)));
    }
}
