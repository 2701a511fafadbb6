//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `FLOWBOT_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use flowbot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod classifier;
mod engine;
mod error;
mod script;
mod server;

pub use classifier::{ClassifierConfig, ClassifierProvider};
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use script::ScriptConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Script configuration (DSL file location)
    #[serde(default)]
    pub script: ScriptConfig,

    /// Engine configuration (entry step, canned texts, limits)
    #[serde(default)]
    pub engine: EngineConfig,

    /// Intent classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `FLOWBOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FLOWBOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FLOWBOT__SCRIPT__PATH=...` -> `script.path = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FLOWBOT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("engine.exit_phrases"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.script.validate()?;
        self.engine.validate()?;
        self.classifier.validate()?;
        Ok(())
    }
}
