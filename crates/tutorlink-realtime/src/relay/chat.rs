//! Chat relay and tutor announcements.

use std::sync::Arc;

use tracing::debug;

use crate::connection::handle::ConnectionHandle;
use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;
use crate::presence::registry::PresenceRegistry;

/// Best-effort delivery to connected users. Nothing is retried or acknowledged.
#[derive(Debug)]
pub struct ChatRelay {
    presence: Arc<PresenceRegistry>,
    metrics: Arc<RealtimeMetrics>,
}

impl ChatRelay {
    /// Creates a relay over the given registry.
    pub fn new(presence: Arc<PresenceRegistry>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self { presence, metrics }
    }

    /// Pushes `matched {tutor}` to one connection.
    pub fn announce_match(&self, handle: &ConnectionHandle, tutor: &str) -> bool {
        let sent = handle.send(OutboundMessage::Matched {
            tutor: tutor.to_string(),
        });
        if sent {
            self.metrics.match_announced();
            debug!(conn_id = %handle.id, tutor = %tutor, "Match announced");
        }
        sent
    }

    /// Forwards `{sender, message}` to `receiver` if online.
    ///
    /// Returns whether the message was queued. An offline receiver is a
    /// silent drop, not an error.
    pub async fn relay(&self, sender: &str, receiver: &str, message: &str) -> bool {
        let Some(session) = self.presence.lookup(receiver).await else {
            debug!(sender = %sender, receiver = %receiver, "Receiver offline, dropping message");
            self.metrics.message_dropped();
            return false;
        };

        let sent = session.handle.send(OutboundMessage::ChatMessage {
            sender: sender.to_string(),
            message: message.to_string(),
        });

        if sent {
            self.metrics.message_relayed();
            debug!(sender = %sender, receiver = %receiver, conn_id = %session.handle.id, "Message relayed");
        } else {
            self.metrics.message_dropped();
        }
        sent
    }
}
