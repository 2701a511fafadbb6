//! Application service tying the engine to the session store.
//!
//! The transport layer calls this and nothing else: start a conversation,
//! deliver a message or idle poll, query status. Ended conversations are
//! removed from the store here, so a session id stops resolving the moment
//! its conversation terminates.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::conversation::{ConversationEngine, InputEvent, Turn};

use super::session_store::SessionStore;

/// Failures the transport layer must translate.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown or expired session '{0}'")]
    UnknownSession(Uuid),
}

/// One conversation turn plus the session it belongs to.
#[derive(Debug, Clone)]
pub struct SessionTurn {
    pub session_id: Uuid,
    pub turn: Turn,
}

/// Front door for conversation operations.
pub struct ConversationService {
    engine: ConversationEngine,
    store: Arc<SessionStore>,
}

impl ConversationService {
    pub fn new(engine: ConversationEngine, store: Arc<SessionStore>) -> Self {
        Self { engine, store }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Starts a conversation: runs the entry step and registers the session
    /// unless the script ended it immediately.
    pub async fn start(&self) -> SessionTurn {
        let now = Utc::now();
        let (session, turn) = self.engine.start(now);

        let session_id = if turn.ended {
            // Nothing to store; the id is only a handle for this response.
            Uuid::new_v4()
        } else {
            self.store.insert(session, now).await
        };

        info!(session_id = %session_id, step = %turn.current_step, ended = turn.ended, "conversation started");
        SessionTurn { session_id, turn }
    }

    /// Delivers a user message (`Some`) or an idle poll (`None`).
    pub async fn handle_message(
        &self,
        session_id: Uuid,
        text: Option<String>,
    ) -> Result<Turn, ServiceError> {
        let entry = self
            .store
            .get(session_id)
            .await
            .ok_or(ServiceError::UnknownSession(session_id))?;

        // Entry lock serializes events for this session.
        let mut guard = entry.lock().await;
        let now = Utc::now();
        let event = match text {
            Some(text) => InputEvent::user_text(text, now),
            None => InputEvent::idle_tick(now),
        };
        let turn = self.engine.process(&mut guard.session, event).await;
        guard.touched_at = now;
        drop(guard);

        if turn.ended {
            self.store.remove(session_id).await;
            info!(session_id = %session_id, "conversation ended");
        }
        Ok(turn)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockClassifier;
    use crate::domain::conversation::EngineSettings;
    use crate::domain::script::ScriptRegistry;

    const SCRIPT: &str = r#"
Step welcome
  Speak "您好"
  Listen 10, 30
  Branch "门票", ticket
  Default welcome
Step ticket
  Speak "ticket info"
  Exit
"#;

    fn service() -> ConversationService {
        let loaded = ScriptRegistry::load(SCRIPT).unwrap();
        let engine = ConversationEngine::new(
            Arc::new(loaded.registry),
            Arc::new(MockClassifier::new()),
            EngineSettings::default(),
        );
        ConversationService::new(engine, Arc::new(SessionStore::new()))
    }

    #[tokio::test]
    async fn start_registers_a_live_session() {
        let service = service();
        let started = service.start().await;

        assert!(!started.turn.ended);
        assert_eq!(started.turn.messages, vec!["您好"]);
        assert_eq!(service.store().len().await, 1);
    }

    #[tokio::test]
    async fn ended_conversation_is_removed_from_the_store() {
        let service = service();
        let started = service.start().await;

        let turn = service
            .handle_message(started.session_id, Some("我要门票".to_string()))
            .await
            .unwrap();

        assert!(turn.ended);
        assert_eq!(service.store().len().await, 0);

        let err = service
            .handle_message(started.session_id, Some("hello".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnknownSession(_)));
    }

    #[tokio::test]
    async fn unknown_session_is_an_error() {
        let service = service();
        let err = service.handle_message(Uuid::new_v4(), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownSession(_)));
    }

    #[tokio::test]
    async fn idle_poll_right_after_start_is_a_no_op() {
        let service = service();
        let started = service.start().await;

        let turn = service.handle_message(started.session_id, None).await.unwrap();

        assert!(turn.no_op);
        assert!(!turn.ended);
        assert_eq!(turn.current_step, "welcome");
        assert_eq!(service.store().len().await, 1);
    }
}
