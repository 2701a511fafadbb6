//! Application layer: session bookkeeping and the service the transport
//! adapters call into.

mod conversation_service;
mod session_store;

pub use conversation_service::{ConversationService, ServiceError, SessionTurn};
pub use session_store::{SessionStore, StoredSession};
