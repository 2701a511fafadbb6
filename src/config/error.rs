//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Script path must not be empty")]
    MissingScriptPath,

    #[error("Entry step name must not be empty")]
    MissingEntryStep,

    #[error("Classifier wait must be between 1 and 120 seconds")]
    InvalidClassifierWait,

    #[error("LLM classifier selected but no API key configured")]
    MissingClassifierApiKey,

    #[error("Session idle TTL must be at least 60 seconds")]
    InvalidSessionTtl,
}
