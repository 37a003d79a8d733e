use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::session::{Session, SessionId};

/// All live sessions of one server process.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session by id.
    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Resolve the session a client asked for, or open a new one.
    ///
    /// Unknown or absent ids get a fresh session with a newly generated id;
    /// a client-supplied id is never adopted. The flag is `true` when a
    /// session was created.
    pub fn get_or_create(&self, requested: Option<SessionId>) -> (Arc<Session>, bool) {
        if let Some(session) = requested.and_then(|id| self.get(&id)) {
            return (session, false);
        }

        let session = Arc::new(Session::new(SessionId::new()));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id(), Arc::clone(&session));
        tracing::debug!(session = %session.id(), "opened session");
        (session, true)
    }

    /// Drop a session and its data. Returns `true` if it existed.
    pub fn remove(&self, id: &SessionId) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    /// Drop every session idle for longer than `max_idle` as of `now`.
    ///
    /// Sessions currently held by a request are kept. Returns the number of
    /// sessions removed.
    pub fn prune_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = now - max_idle;
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| session.is_busy() || session.last_seen() >= cutoff);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::info!(pruned, remaining = sessions.len(), "pruned idle sessions");
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
