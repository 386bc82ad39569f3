//! Presence registry: username to live connection.
//!
//! All mutation and the tutor scan on join happen under one mutex, so two
//! racing joins can neither lose an update nor both read a stale tutor set.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use tutorlink_entity::user::UserRole;

use crate::connection::handle::{ConnectionHandle, ConnectionId};

/// One identified user bound to one connection.
#[derive(Debug, Clone)]
pub struct Session {
    /// Username as claimed at join.
    pub username: String,
    /// Role as claimed at join.
    pub role: UserRole,
    /// Live connection.
    pub handle: Arc<ConnectionHandle>,
}

/// What a join changed.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    /// Connection that held the username before, if it was overwritten.
    pub replaced: Option<ConnectionId>,
    /// Tutor to announce to a joining student.
    pub tutor: Option<String>,
}

/// Sessions keyed by username. Last join wins.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl PresenceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the session for `username`.
    ///
    /// For a student, also picks one currently registered tutor, in map
    /// iteration order.
    pub async fn join(
        &self,
        username: &str,
        role: UserRole,
        handle: Arc<ConnectionHandle>,
    ) -> JoinOutcome {
        let conn_id = handle.id;
        let mut sessions = self.sessions.lock().await;

        let replaced = sessions
            .insert(
                username.to_string(),
                Session {
                    username: username.to_string(),
                    role,
                    handle,
                },
            )
            .map(|previous| previous.handle.id)
            .filter(|previous| *previous != conn_id);

        let tutor = if role == UserRole::Student {
            sessions
                .values()
                .find(|s| s.role == UserRole::Tutor)
                .map(|s| s.username.clone())
        } else {
            None
        };

        drop(sessions);

        if let Some(old) = replaced {
            info!(username = %username, old_conn = %old, conn_id = %conn_id, "Session overwritten");
        }
        debug!(username = %username, role = %role, conn_id = %conn_id, "Session joined");

        JoinOutcome { replaced, tutor }
    }

    /// Removes every session bound to `conn_id`. Returns how many were removed.
    pub async fn leave(&self, conn_id: ConnectionId) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.handle.id != conn_id);
        let removed = before - sessions.len();
        drop(sessions);

        if removed > 0 {
            debug!(conn_id = %conn_id, "Session left");
        }
        removed
    }

    /// Current session for `username`.
    pub async fn lookup(&self, username: &str) -> Option<Session> {
        self.sessions.lock().await.get(username).cloned()
    }

    /// Number of identified users online.
    pub async fn online_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
