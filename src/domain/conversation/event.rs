//! Engine inputs and outputs: what arrives from the transport and what a
//! single processed event produces.

use chrono::{DateTime, Utc};

/// One input delivered to the engine for an existing session.
///
/// The transport supplies the clock reading so the engine stays free of
/// ambient time and tests can drive it with a synthetic clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// User utterance, or `None` for an idle poll tick.
    pub text: Option<String>,
    /// Wall-clock instant the event was received.
    pub now: DateTime<Utc>,
}

impl InputEvent {
    /// An event carrying a user utterance.
    pub fn user_text(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            text: Some(text.into()),
            now,
        }
    }

    /// An idle tick: no utterance, only the passage of time.
    pub fn idle_tick(now: DateTime<Utc>) -> Self {
        Self { text: None, now }
    }

    /// The trimmed utterance, or `None` if the event is an idle tick or the
    /// utterance is whitespace-only (which the engine treats as idle).
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Everything the engine produced for one processed event.
///
/// The transport serializes this verbatim; timeout fields let a polling
/// client show a countdown without holding a connection open.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Messages spoken this turn, in order, already deduplicated per step.
    pub messages: Vec<String>,
    /// True when the conversation has terminated and the session is dead.
    pub ended: bool,
    /// Step the session rests in after this turn.
    pub current_step: String,
    /// Soft (reminder) timeout of the resting step, in milliseconds.
    pub reminder_timeout_ms: u64,
    /// Hard (total-silence) timeout of the resting step, in seconds.
    pub total_silence_timeout_secs: u64,
    /// Seconds of hard timeout left in the current silence span.
    pub remaining_total_silence_secs: f64,
    /// True for an idle tick that changed nothing and spoke nothing.
    pub no_op: bool,
    /// Reminders fired since the user last spoke.
    pub silence_count: u32,
}
