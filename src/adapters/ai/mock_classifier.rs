//! Mock intent classifier for tests.
//!
//! Queued answers are consumed in order; an optional delay simulates a slow
//! backend for timeout tests, and calls are recorded for verification.
//!
//! # Example
//!
//! ```ignore
//! let classifier = MockClassifier::new()
//!     .with_answer(Some("门票"))
//!     .with_delay(Duration::from_millis(50));
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::ports::{ClassifierError, IntentClassifier};

/// One recorded classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub utterance: String,
    pub candidates: Vec<String>,
}

/// A queued mock outcome.
#[derive(Debug, Clone)]
enum MockAnswer {
    Label(Option<String>),
    Error(String),
}

/// Configurable mock implementation of the classifier port.
#[derive(Debug, Clone, Default)]
pub struct MockClassifier {
    answers: Arc<Mutex<VecDeque<MockAnswer>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Duration,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful answer (`None` means "no match").
    pub fn with_answer(self, label: Option<&str>) -> Self {
        self.answers
            .lock()
            .expect("mock answer queue poisoned")
            .push_back(MockAnswer::Label(label.map(str::to_string)));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, reason: impl Into<String>) -> Self {
        self.answers
            .lock()
            .expect("mock answer queue poisoned")
            .push_back(MockAnswer::Error(reason.into()));
        self
    }

    /// Sets a simulated latency applied to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Calls made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(
        &self,
        utterance: &str,
        candidates: &[String],
    ) -> Result<Option<String>, ClassifierError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(RecordedCall {
                utterance: utterance.to_string(),
                candidates: candidates.to_vec(),
            });

        let next = self
            .answers
            .lock()
            .expect("mock answer queue poisoned")
            .pop_front();
        match next {
            Some(MockAnswer::Label(label)) => Ok(label),
            Some(MockAnswer::Error(reason)) => Err(ClassifierError::unavailable(reason)),
            // An unconfigured mock is a benign "no match".
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_are_consumed_in_order() {
        let classifier = MockClassifier::new()
            .with_answer(Some("门票"))
            .with_answer(None);
        let candidates = vec!["门票".to_string()];

        assert_eq!(
            classifier.classify("a", &candidates).await.unwrap().as_deref(),
            Some("门票")
        );
        assert_eq!(classifier.classify("b", &candidates).await.unwrap(), None);
        // Exhausted queue keeps answering "no match".
        assert_eq!(classifier.classify("c", &candidates).await.unwrap(), None);
    }

    #[tokio::test]
    async fn errors_are_queued_like_answers() {
        let classifier = MockClassifier::new().with_error("backend down");
        let result = classifier.classify("a", &["门票".to_string()]).await;
        assert!(matches!(result, Err(ClassifierError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let classifier = MockClassifier::new();
        classifier
            .classify("我要门票", &["门票".to_string()])
            .await
            .unwrap();

        let calls = classifier.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].utterance, "我要门票");
        assert_eq!(calls[0].candidates, vec!["门票".to_string()]);
    }
}
