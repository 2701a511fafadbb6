//! Outbound ports: traits the domain and application layers depend on,
//! implemented by adapters.
//!
//! - [`IntentClassifier`] - maps an utterance onto a step's branch keywords
//! - [`ScriptSource`] - supplies the raw DSL text a registry is loaded from

mod intent_classifier;
mod script_source;

pub use intent_classifier::{ClassifierError, IntentClassifier};
pub use script_source::{ScriptSource, ScriptSourceError};
