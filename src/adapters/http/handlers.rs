//! HTTP handlers for the conversation endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{ConversationService, ServiceError};

use super::dto::{ErrorResponse, MessageRequest, SessionStatusRequest, TurnResponse};

/// Shared handler state.
#[derive(Clone)]
pub struct ConversationHandlers {
    service: Arc<ConversationService>,
}

impl ConversationHandlers {
    pub fn new(service: Arc<ConversationService>) -> Self {
        Self { service }
    }
}

/// POST /api/start - open a conversation and speak the entry step.
pub async fn start_session(State(handlers): State<ConversationHandlers>) -> Response {
    let started = handlers.service.start().await;
    let response = TurnResponse::from_turn(started.session_id, started.turn);
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/message - deliver a user message or an idle poll.
pub async fn post_message(
    State(handlers): State<ConversationHandlers>,
    Json(req): Json<MessageRequest>,
) -> Response {
    // Empty text is an idle poll, same as an absent field.
    let text = req.message.filter(|m| !m.trim().is_empty());

    match handlers.service.handle_message(req.session_id, text).await {
        Ok(turn) => {
            let response = TurnResponse::from_turn(req.session_id, turn);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_service_error(e),
    }
}

/// POST /api/session_status - timeout poll. Processed as an idle tick so the
/// silence policy advances even when the client only polls.
pub async fn session_status(
    State(handlers): State<ConversationHandlers>,
    Json(req): Json<SessionStatusRequest>,
) -> Response {
    match handlers.service.handle_message(req.session_id, None).await {
        Ok(turn) => {
            let response = TurnResponse::from_turn(req.session_id, turn);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_service_error(e),
    }
}

/// Maps service errors to wire responses. Unknown sessions carry `end: true`
/// so polling clients stop.
fn handle_service_error(error: ServiceError) -> Response {
    match error {
        ServiceError::UnknownSession(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: error.to_string(),
                end: true,
            }),
        )
            .into_response(),
    }
}
