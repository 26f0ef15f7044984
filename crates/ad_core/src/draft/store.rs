//! Session store: creation, lookup, serialized mutation.
//!
//! Each session sits behind its own `Mutex`, so at most one mutation is in
//! flight per session while operations on different sessions proceed
//! independently. The outer `RwLock` only guards the id map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{Duration, Utc};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::models::Team;

use super::session::{DraftSession, DraftSnapshot};

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<DraftSession>>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self { sessions: RwLock::new(HashMap::new()) }
    }

    /// Create and register a session, returning its initial snapshot.
    pub fn create(
        &self,
        event_key: impl Into<String>,
        pool: &[Team],
        num_rounds: u32,
    ) -> Result<DraftSnapshot> {
        let session = DraftSession::new(event_key, pool, num_rounds)?;
        let snapshot = session.to_snapshot();
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(session.session_id().to_string(), Arc::new(Mutex::new(session)));
        Ok(snapshot)
    }

    fn slot(&self, session_id: &str) -> Result<Arc<Mutex<DraftSession>>> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(session_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("Draft session not found: {session_id}")))
    }

    /// Run a closure against the session under its mutation lock.
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut DraftSession) -> Result<R>,
    ) -> Result<R> {
        let slot = self.slot(session_id)?;
        let mut session = slot.lock().expect("draft session lock poisoned");
        f(&mut session)
    }

    /// Read-only snapshot; may trail a concurrent mutation by one pick.
    pub fn snapshot(&self, session_id: &str) -> Result<DraftSnapshot> {
        self.with_session(session_id, |s| Ok(s.to_snapshot()))
    }

    /// Drop sessions older than `max_age`; returns how many were removed.
    pub fn purge_older_than(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut sessions = self.sessions.write().expect("session store lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, slot| {
            slot.lock().expect("draft session lock poisoned").created_at() > cutoff
        });
        let purged = before - sessions.len();
        if purged > 0 {
            debug!("purged {purged} stale draft sessions");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.read().expect("session store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
