//! HTTP DTOs for the conversation endpoints.
//!
//! These types decouple the wire format from domain types. Clients poll, so
//! every turn response carries the timers they need to render a countdown.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::conversation::Turn;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of POST /api/message. An absent or empty `message` is an idle poll.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub session_id: Uuid,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of POST /api/session_status.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatusRequest {
    pub session_id: Uuid,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One conversation turn as the client sees it.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    /// Messages of the turn joined with newlines; empty on a no-op tick.
    pub message: String,
    pub end: bool,
    pub current_step: String,
    /// Soft (reminder) timeout in milliseconds.
    pub timeout: u64,
    /// Hard timeout in seconds.
    pub total_silence_timeout: u64,
    /// Seconds of hard timeout left in the current silence span.
    pub remaining_total_timeout: f64,
    pub current_silence_count: u32,
    pub no_op: bool,
}

impl TurnResponse {
    pub fn from_turn(session_id: Uuid, turn: Turn) -> Self {
        Self {
            session_id,
            message: turn.messages.join("\n"),
            end: turn.ended,
            current_step: turn.current_step,
            timeout: turn.reminder_timeout_ms,
            total_silence_timeout: turn.total_silence_timeout_secs,
            remaining_total_timeout: turn.remaining_total_silence_secs,
            current_silence_count: turn.silence_count,
            no_op: turn.no_op,
        }
    }
}

/// Error payload. `end` tells the client to stop polling.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub end: bool,
}
