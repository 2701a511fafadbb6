//! Intent classifier adapters.
//!
//! - [`LlmClassifier`] - OpenAI-compatible chat API backend
//! - [`KeywordClassifier`] - offline synonym-table backend
//! - [`MockClassifier`] - configurable test double

mod keyword_classifier;
mod llm_classifier;
mod mock_classifier;

pub use keyword_classifier::KeywordClassifier;
pub use llm_classifier::{LlmClassifier, LlmClassifierConfig};
pub use mock_classifier::{MockClassifier, RecordedCall};
