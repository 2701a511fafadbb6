//! LLM-backed intent classifier.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint and asks the model
//! to pick one candidate label, answering `unknown` when nothing fits. The
//! model reply is resolved leniently: exact label match first, then a label
//! contained in the reply.
//!
//! # Configuration
//!
//! ```ignore
//! let config = LlmClassifierConfig::new(api_key)
//!     .with_model("deepseek-chat")
//!     .with_base_url("https://api.deepseek.com/v1");
//!
//! let classifier = LlmClassifier::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::ports::{ClassifierError, IntentClassifier};

/// Configuration for the LLM classifier.
#[derive(Debug, Clone)]
pub struct LlmClassifierConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "deepseek-chat", "gpt-4o-mini").
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl LlmClassifierConfig {
    /// Creates a configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "deepseek-chat".to_string(),
            base_url: "https://api.deepseek.com/v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Classifier implementation over an OpenAI-compatible chat API.
pub struct LlmClassifier {
    config: LlmClassifierConfig,
    client: Client,
}

impl LlmClassifier {
    /// Creates a classifier with the given configuration.
    pub fn new(config: LlmClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::unavailable(format!("HTTP client setup: {}", e)))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn system_prompt(candidates: &[String]) -> String {
        let listed = candidates
            .iter()
            .map(|c| format!("'{}'", c))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "你是一个对话系统的意图分类器。\n\
             请将用户的输入分类到以下标准意图之一：[{}]。\n\
             要求：\n\
             1. 仅返回意图名称，不要包含任何标点或其他文字。\n\
             2. 如果无法匹配，返回 'unknown'。",
            listed
        )
    }

    /// Maps the raw model reply onto a candidate: exact match, then the first
    /// candidate the reply contains.
    fn resolve(reply: &str, candidates: &[String]) -> Option<String> {
        let cleaned = reply.trim().replace(['"', '\''], "");
        if cleaned.is_empty() || cleaned == "unknown" {
            return None;
        }
        if let Some(exact) = candidates.iter().find(|c| **c == cleaned) {
            return Some(exact.clone());
        }
        candidates
            .iter()
            .find(|c| cleaned.contains(c.as_str()))
            .cloned()
    }
}

#[async_trait]
impl IntentClassifier for LlmClassifier {
    async fn classify(
        &self,
        utterance: &str,
        candidates: &[String],
    ) -> Result<Option<String>, ClassifierError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::system_prompt(candidates),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("用户输入：{}", utterance),
                },
            ],
            temperature: 0.1,
            max_tokens: 20,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout {
                        seconds: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    ClassifierError::network(format!("connection failed: {}", e))
                } else {
                    ClassifierError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => ClassifierError::AuthenticationFailed,
                500..=599 => {
                    ClassifierError::unavailable(format!("server error {}: {}", status, body))
                }
                _ => ClassifierError::network(format!("unexpected status {}: {}", status, body)),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::parse(e.to_string()))?;
        let reply = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        let label = Self::resolve(reply, candidates);
        debug!(%utterance, %reply, ?label, "llm classifier answered");
        Ok(label)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolve_prefers_exact_match() {
        let got = LlmClassifier::resolve("门票", &labels(&["门票", "开放时间"]));
        assert_eq!(got.as_deref(), Some("门票"));
    }

    #[test]
    fn resolve_accepts_label_embedded_in_chatter() {
        let got = LlmClassifier::resolve("意图是：门票。", &labels(&["门票", "开放时间"]));
        assert_eq!(got.as_deref(), Some("门票"));
    }

    #[test]
    fn resolve_strips_quotes() {
        let got = LlmClassifier::resolve("'开放时间'", &labels(&["门票", "开放时间"]));
        assert_eq!(got.as_deref(), Some("开放时间"));
    }

    #[test]
    fn unknown_and_empty_replies_are_no_match() {
        let candidates = labels(&["门票"]);
        assert_eq!(LlmClassifier::resolve("unknown", &candidates), None);
        assert_eq!(LlmClassifier::resolve("  ", &candidates), None);
        assert_eq!(LlmClassifier::resolve("天气", &candidates), None);
    }

    #[test]
    fn system_prompt_lists_every_candidate() {
        let prompt = LlmClassifier::system_prompt(&labels(&["门票", "开放时间"]));
        assert!(prompt.contains("'门票'"));
        assert!(prompt.contains("'开放时间'"));
        assert!(prompt.contains("unknown"));
    }
}
