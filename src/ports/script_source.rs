//! Outbound port for obtaining script text.

use thiserror::Error;

/// Failure to obtain a script's source text.
#[derive(Debug, Error)]
pub enum ScriptSourceError {
    #[error("script not found at '{location}'")]
    NotFound { location: String },

    #[error("failed to read script from '{location}': {reason}")]
    Io { location: String, reason: String },
}

/// Supplies the raw DSL text a registry is loaded from.
///
/// Loading happens once at startup; the registry built from the text is then
/// shared immutably, so this port is synchronous.
pub trait ScriptSource: Send + Sync {
    /// Human-readable origin, for logs.
    fn location(&self) -> String;

    /// Reads the full script text.
    fn read(&self) -> Result<String, ScriptSourceError>;
}
