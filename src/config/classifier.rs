//! Intent classifier configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Which classifier backend to run.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierProvider {
    /// Offline synonym-table matching, no network
    #[default]
    Keyword,
    /// OpenAI-compatible chat API
    Llm,
    /// Always answers "no match" (for tests and demos)
    Mock,
}

/// Classifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Backend selection
    #[serde(default)]
    pub provider: ClassifierProvider,

    /// API key for the LLM backend
    pub api_key: Option<Secret<String>>,

    /// Model name for the LLM backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate classifier configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == ClassifierProvider::Llm && self.api_key.is_none() {
            return Err(ValidationError::MissingClassifierApiKey);
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: ClassifierProvider::default(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}
