//! HTTP routes for the conversation endpoints.

use axum::{routing::post, Router};

use super::handlers::{post_message, session_status, start_session, ConversationHandlers};

/// Creates the conversation router. Mounted under `/api` by the server.
pub fn conversation_routes(handlers: ConversationHandlers) -> Router {
    Router::new()
        .route("/start", post(start_session))
        .route("/message", post(post_message))
        .route("/session_status", post(session_status))
        .with_state(handlers)
}
