//! Per-conversation mutable state.

use chrono::{DateTime, Utc};

/// The engine-owned record for one active conversation.
///
/// Arena-style: the transport layer holds one record per session id and the
/// engine mutates it exactly once per processed event or idle tick. The
/// current step name *is* the state-machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Name of the step the conversation is currently in.
    pub current_step: String,
    /// Number of soft-timeout reminders fired since the user last spoke.
    pub silence_count: u32,
    /// Time of the last user interaction (or the last reminder, which resets
    /// the soft clock so a reminder fires once per interval).
    pub last_interaction_at: DateTime<Utc>,
    /// When the current silence span started; absent while the user is active.
    pub total_silence_started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a fresh session positioned at the entry step.
    pub fn new(entry_step: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            current_step: entry_step.into(),
            silence_count: 0,
            last_interaction_at: now,
            total_silence_started_at: None,
        }
    }

    /// Resets all silence bookkeeping because the user is active.
    pub fn note_user_activity(&mut self, now: DateTime<Utc>) {
        self.silence_count = 0;
        self.last_interaction_at = now;
        self.total_silence_started_at = None;
    }

    /// Records a fired reminder: the soft clock restarts, the hard clock
    /// keeps running.
    pub fn note_reminder(&mut self, now: DateTime<Utc>) {
        self.silence_count += 1;
        self.last_interaction_at = now;
    }
}
