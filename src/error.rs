//! Error types for soapenc
//!
//! The encoder itself never fails: unrecognised shapes degrade to diagnostic
//! markup instead. Errors only surface at the edges of the crate, when
//! keywords are parsed, configuration is loaded or JSON input is converted.

use std::fmt;
use thiserror::Error;

/// Result type alias using soapenc Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for soapenc operations
#[derive(Error, Debug)]
pub enum Error {
    /// Value error (unknown keyword, unsupported input)
    #[error("value error: {0}")]
    Value(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading error with context
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Offending configuration key
    pub key: Option<String>,
}

impl ConfigError {
    /// Create a new configuration error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: None,
        }
    }

    /// Set the offending key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref key) = self.key {
            write!(f, " (key: {})", key)?;
        }

        Ok(())
    }
}

impl std::error::Error for ConfigError {}
