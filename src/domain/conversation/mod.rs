//! Conversation runtime: sessions, events, the silence policy and the
//! state-machine engine that ties them to a loaded script.

mod engine;
mod event;
mod session;
mod silence;

pub use engine::{ConversationEngine, EngineSettings};
pub use event::{InputEvent, Turn};
pub use session::Session;
pub use silence::{SilencePolicy, SilenceVerdict};
