//! Conversation engine configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::conversation::EngineSettings;

use super::error::ValidationError;

/// Engine configuration: entry/exit steps, canned texts and engine limits.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Step a fresh conversation starts in
    #[serde(default = "default_entry_step")]
    pub entry_step: String,

    /// Step an exit phrase routes to when the script defines it
    #[serde(default = "default_exit_step")]
    pub exit_step: String,

    /// Phrases that end the conversation (comma-separated when set via env)
    #[serde(default = "default_exit_phrases")]
    pub exit_phrases: Vec<String>,

    /// Farewell spoken when the conversation ends without a scripted goodbye
    #[serde(default = "default_farewell_text")]
    pub farewell_text: String,

    /// Message spoken when the silence policy terminates the conversation
    #[serde(default = "default_silence_end_text")]
    pub silence_end_text: String,

    /// Message spoken when a step runs out of actions with nowhere to go
    #[serde(default = "default_no_followup_text")]
    pub no_followup_text: String,

    /// Hard cap on a single classifier call, in seconds
    #[serde(default = "default_classifier_wait_secs")]
    pub classifier_wait_secs: u64,

    /// Ceiling on chained fallback transitions within one turn
    #[serde(default = "default_max_fallback_hops")]
    pub max_fallback_hops: u32,

    /// Sessions idle longer than this are evicted, in seconds
    #[serde(default = "default_session_idle_ttl_secs")]
    pub session_idle_ttl_secs: u64,
}

impl EngineConfig {
    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.entry_step.trim().is_empty() {
            return Err(ValidationError::MissingEntryStep);
        }
        if self.classifier_wait_secs == 0 || self.classifier_wait_secs > 120 {
            return Err(ValidationError::InvalidClassifierWait);
        }
        if self.session_idle_ttl_secs < 60 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        Ok(())
    }

    /// Converts into the settings struct the engine consumes.
    pub fn to_settings(&self) -> EngineSettings {
        EngineSettings {
            entry_step: self.entry_step.clone(),
            exit_step: self.exit_step.clone(),
            exit_phrases: self.exit_phrases.clone(),
            farewell_text: self.farewell_text.clone(),
            silence_end_text: self.silence_end_text.clone(),
            no_followup_text: self.no_followup_text.clone(),
            classifier_wait: Duration::from_secs(self.classifier_wait_secs),
            max_fallback_hops: self.max_fallback_hops,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entry_step: default_entry_step(),
            exit_step: default_exit_step(),
            exit_phrases: default_exit_phrases(),
            farewell_text: default_farewell_text(),
            silence_end_text: default_silence_end_text(),
            no_followup_text: default_no_followup_text(),
            classifier_wait_secs: default_classifier_wait_secs(),
            max_fallback_hops: default_max_fallback_hops(),
            session_idle_ttl_secs: default_session_idle_ttl_secs(),
        }
    }
}

fn default_entry_step() -> String {
    "welcome".to_string()
}

fn default_exit_step() -> String {
    "exitProc".to_string()
}

fn default_exit_phrases() -> Vec<String> {
    ["再见", "退出", "exit", "quit", "没有"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_farewell_text() -> String {
    "再见！感谢您的使用。".to_string()
}

fn default_silence_end_text() -> String {
    "长时间未收到回复，本次会话已结束。".to_string()
}

fn default_no_followup_text() -> String {
    "当前流程已结束，感谢您的使用。".to_string()
}

fn default_classifier_wait_secs() -> u64 {
    15
}

fn default_max_fallback_hops() -> u32 {
    8
}

fn default_session_idle_ttl_secs() -> u64 {
    1800
}
