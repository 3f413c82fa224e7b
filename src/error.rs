//! Error types for the content gate
//!
//! Schema-shape problems are never errors in this sense: they are collected
//! into a [`crate::contracts::ValidationResult`]. `GateError` covers the
//! failures around the engine: bad CLI input, unreadable files, malformed
//! JSON, configuration problems.

use thiserror::Error;

/// Main error type for gate operations
#[derive(Error, Debug)]
pub enum GateError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// JSON / YAML / TOML parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization error while rendering output
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl GateError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        GateError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        GateError::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        GateError::ParseError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GateError::InvalidInput(_)
                | GateError::FileError(_)
                | GateError::ParseError(_)
                | GateError::ConfigError(_)
        )
    }
}

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        GateError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for GateError {
    fn from(err: serde_yaml::Error) -> Self {
        GateError::SerializationError(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for GateError {
    fn from(err: toml::de::Error) -> Self {
        GateError::ConfigError(format!("TOML error: {}", err))
    }
}

/// Result type alias for gate operations
pub type Result<T> = std::result::Result<T, GateError>;
