//! Inbound and outbound WebSocket message type definitions.
//!
//! Every frame is a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};

use tutorlink_entity::user::UserRole;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    /// Announce identity on this connection.
    Join {
        /// Claimed username. Not checked against the directory.
        username: String,
        /// Claimed role.
        role: UserRole,
    },
    /// Send a chat line to another connected user.
    ChatMessage {
        /// Sender username as supplied by the client.
        sender: String,
        /// Recipient username.
        receiver: String,
        /// Message body.
        message: String,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// A tutor is online for the student who just joined.
    Matched {
        /// Tutor username.
        tutor: String,
    },
    /// Chat line forwarded from another user.
    ChatMessage {
        /// Sender username.
        sender: String,
        /// Message body.
        message: String,
    },
    /// Protocol error on the last frame.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl OutboundMessage {
    /// Builds an error frame.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
