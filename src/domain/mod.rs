//! Domain layer: the script front end and the conversation runtime.
//!
//! Everything here is transport-agnostic. The only outward dependency is the
//! [`crate::ports::IntentClassifier`] trait the engine consults during the
//! listening phase.

pub mod conversation;
pub mod script;
