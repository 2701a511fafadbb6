//! HTTP transport: DTOs, handlers and routes for the conversation API.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ConversationHandlers;
pub use routes::conversation_routes;
