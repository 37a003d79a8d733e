use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::SessionError;
use crate::memory::InMemorySessionStore;

/// Identifier of one client session (UUID v7, so ids sort by creation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SessionError::InvalidId(s.to_string()))
    }
}

/// One client's session: its store and the gate serializing its writers.
///
/// The engine does a full read-modify-write of the session's root value on
/// each operation. Callers hold [`Session::lock`] for the duration of one
/// request so those cycles never interleave within a session.
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    last_seen: RwLock<DateTime<Utc>>,
    store: InMemorySessionStore,
    gate: Mutex<()>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self::new_at(id, Utc::now())
    }

    /// Create a session with an explicit creation time.
    pub fn new_at(id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            last_seen: RwLock::new(now),
            store: InMemorySessionStore::new(),
            gate: Mutex::new(()),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record activity at `now`.
    pub fn touch_at(&self, now: DateTime<Utc>) {
        let mut last_seen = self.last_seen.write().unwrap_or_else(PoisonError::into_inner);
        if now > *last_seen {
            *last_seen = now;
        }
    }

    /// Wait for exclusive access to the session's store.
    pub async fn lock(&self) -> SessionGuard<'_> {
        let gate = self.gate.lock().await;
        self.touch_at(Utc::now());
        SessionGuard {
            _gate: gate,
            store: &self.store,
        }
    }

    /// Whether some request currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.gate.try_lock().is_err()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("last_seen", &self.last_seen())
            .field("store", &self.store)
            .finish()
    }
}

/// Exclusive handle to a session's store; releases the gate on drop.
pub struct SessionGuard<'a> {
    _gate: MutexGuard<'a, ()>,
    store: &'a InMemorySessionStore,
}

impl Deref for SessionGuard<'_> {
    type Target = InMemorySessionStore;

    fn deref(&self) -> &Self::Target {
        self.store
    }
}
