// src/error.rs

use thiserror::Error;

/// Core error types for Kettle
#[derive(Error, Debug)]
pub enum Error {
    /// Installer profile or catalogue is misconfigured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A validation rule failed while producing diagnostics
    #[error("Rule execution failed: {0}")]
    RuleExecution(String),

    /// Manifest could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a rule execution error
    pub fn rule_execution(msg: impl Into<String>) -> Self {
        Self::RuleExecution(msg.into())
    }
}

/// Result type alias using Kettle's Error type
pub type Result<T> = std::result::Result<T, Error>;
