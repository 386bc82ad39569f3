//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{RwLock, mpsc};
use tracing::warn;
use uuid::Uuid;

use tutorlink_entity::user::UserRole;

use crate::message::types::OutboundMessage;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Lifecycle of a single connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Open, no `join` received yet.
    Anonymous,
    /// A `join` has bound a username and role to the connection.
    Identified {
        /// Claimed username.
        username: String,
        /// Claimed role.
        role: UserRole,
    },
    /// Socket closed. Terminal.
    Closed,
}

/// A handle to a single WebSocket connection.
///
/// Holds the bounded sender feeding the socket writer task.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    sender: mpsc::Sender<OutboundMessage>,
    state: RwLock<ConnectionState>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new anonymous connection handle
    pub fn new(sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            state: RwLock::new(ConnectionState::Anonymous),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an outbound message. Returns false if it was dropped.
    ///
    /// Never waits: a full queue drops the message.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.alive.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Bind a username and role. Re-joining replaces the previous identity.
    pub async fn identify(&self, username: String, role: UserRole) {
        let mut state = self.state.write().await;
        if *state != ConnectionState::Closed {
            *state = ConnectionState::Identified { username, role };
        }
    }

    /// Username and role, if identified.
    pub async fn identity(&self) -> Option<(String, UserRole)> {
        match &*self.state.read().await {
            ConnectionState::Identified { username, role } => Some((username.clone(), *role)),
            _ => None,
        }
    }

    /// Mark connection as closed
    pub async fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
        *self.state.write().await = ConnectionState::Closed;
    }
}
