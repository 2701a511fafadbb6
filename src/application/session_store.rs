//! In-memory session store.
//!
//! One entry per active conversation, keyed by a v4 UUID. Each entry sits
//! behind its own async mutex so events for one session are processed
//! strictly one at a time, while different sessions proceed in parallel. The
//! outer map lock is held only for lookup and insert/remove.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::domain::conversation::Session;

/// A stored session plus the bookkeeping eviction needs.
#[derive(Debug)]
pub struct StoredSession {
    pub session: Session,
    /// Last time any event (including idle polls) touched this entry.
    pub touched_at: DateTime<Utc>,
}

/// Map of live conversations.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<StoredSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fresh session and returns its id.
    pub async fn insert(&self, session: Session, now: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        let entry = Arc::new(Mutex::new(StoredSession {
            session,
            touched_at: now,
        }));
        self.sessions.write().await.insert(id, entry);
        id
    }

    /// Fetches the entry for a session id. The caller locks the entry to
    /// serialize processing.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<StoredSession>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drops a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Removes sessions idle longer than `max_idle`. Entries currently being
    /// processed are skipped; they are evidently not idle.
    pub async fn evict_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut stale = Vec::new();
        {
            let sessions = self.sessions.read().await;
            for (id, entry) in sessions.iter() {
                if let Ok(guard) = entry.try_lock() {
                    if now - guard.touched_at >= max_idle {
                        stale.push(*id);
                    }
                }
            }
        }

        if stale.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        let mut evicted = 0;
        for id in stale {
            if sessions.remove(&id).is_some() {
                info!(session_id = %id, "evicted idle session");
                evicted += 1;
            }
        }
        evicted
    }
}
