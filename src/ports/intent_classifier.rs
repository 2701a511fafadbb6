//! Outbound port for intent classification.
//!
//! When no branch keyword appears verbatim in an utterance, the engine asks a
//! classifier to pick the closest branch keyword. Implementations live in
//! `adapters::ai`; the engine only sees this trait and degrades every failure
//! to "no match".

use async_trait::async_trait;
use thiserror::Error;

/// Failures a classifier backend can surface.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("classifier request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("classifier authentication failed")]
    AuthenticationFailed,

    #[error("classifier network error: {reason}")]
    Network { reason: String },

    #[error("classifier response could not be parsed: {reason}")]
    Parse { reason: String },
}

impl ClassifierError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}

/// Maps a free-form utterance onto one of a step's branch keywords.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Returns the candidate the utterance most plausibly means, or `None`
    /// when nothing fits. `candidates` is never empty when called by the
    /// engine.
    async fn classify(
        &self,
        utterance: &str,
        candidates: &[String],
    ) -> Result<Option<String>, ClassifierError>;
}
