//! Connection manager: connection lifecycle and inbound event routing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tutorlink_core::config::RealtimeConfig;
use tutorlink_entity::user::UserRole;

use crate::message::types::{InboundMessage, OutboundMessage};
use crate::metrics::RealtimeMetrics;
use crate::presence::registry::PresenceRegistry;
use crate::relay::chat::ChatRelay;

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Manages all open WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: ConnectionPool,
    presence: Arc<PresenceRegistry>,
    relay: Arc<ChatRelay>,
    metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        presence: Arc<PresenceRegistry>,
        relay: Arc<ChatRelay>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            presence,
            relay,
            metrics,
            config,
        }
    }

    /// Registers a new anonymous connection.
    ///
    /// Returns the handle and the receiver the socket writer drains.
    pub fn open(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(tx));

        self.pool.add(handle.clone());
        self.metrics.connection_opened();

        info!(conn_id = %handle.id, "WebSocket connection registered");
        (handle, rx)
    }

    /// Processes one inbound text frame from a client.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };

        self.metrics.message_received();

        let msg: InboundMessage = match serde_json::from_str(raw_message) {
            Ok(m) => m,
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "Unparseable frame");
                handle.send(OutboundMessage::error(
                    "INVALID_MESSAGE",
                    format!("Failed to parse message: {e}"),
                ));
                return;
            }
        };

        match msg {
            InboundMessage::Join { username, role } => {
                self.handle_join(&handle, username, role).await;
            }
            InboundMessage::ChatMessage {
                sender,
                receiver,
                message,
            } => {
                if handle.identity().await.is_none() {
                    debug!(conn_id = %conn_id, "Chat from unidentified connection ignored");
                    return;
                }
                self.relay.relay(&sender, &receiver, &message).await;
            }
        }
    }

    async fn handle_join(&self, handle: &Arc<ConnectionHandle>, username: String, role: UserRole) {
        if username.is_empty() {
            handle.send(OutboundMessage::error(
                "INVALID_MESSAGE",
                "Join requires a username",
            ));
            return;
        }

        // Closed underneath us by close_all.
        if !handle.is_alive() {
            debug!(conn_id = %handle.id, username = %username, "Join on closed connection skipped");
            return;
        }

        handle.identify(username.clone(), role).await;
        let outcome = self.presence.join(&username, role, handle.clone()).await;
        self.metrics.join();

        info!(conn_id = %handle.id, username = %username, role = %role, "User joined");

        if let Some(tutor) = outcome.tutor {
            self.relay.announce_match(handle, &tutor);
        }
    }

    /// Unregisters a connection and drops its session.
    ///
    /// The session is dropped even when the connection already left the pool:
    /// a join can land after `close_all`.
    pub async fn close(&self, conn_id: &ConnectionId) {
        let removed = self.pool.remove(conn_id);
        if let Some(handle) = &removed {
            handle.mark_closed().await;
        }

        self.presence.leave(*conn_id).await;

        if removed.is_some() {
            self.metrics.connection_closed();
            info!(conn_id = %conn_id, "WebSocket connection unregistered");
        }
    }

    /// Closes all connections.
    pub async fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            self.close(&conn.id).await;
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Returns the open connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (ConnectionManager, Arc<PresenceRegistry>) {
        let presence = Arc::new(PresenceRegistry::new());
        let metrics = Arc::new(RealtimeMetrics::new());
        let relay = Arc::new(ChatRelay::new(presence.clone(), metrics.clone()));
        (
            ConnectionManager::new(RealtimeConfig::default(), presence.clone(), relay, metrics),
            presence,
        )
    }

    #[tokio::test]
    async fn test_student_join_announces_connected_tutor() {
        let (manager, _) = manager();
        let (erin, mut erin_rx) = manager.open();
        let (dana, mut dana_rx) = manager.open();

        manager
            .handle_inbound(&erin.id, r#"{"type":"join","username":"erin","role":"tutor"}"#)
            .await;
        assert!(erin_rx.try_recv().is_err());

        manager
            .handle_inbound(&dana.id, r#"{"type":"join","username":"dana","role":"student"}"#)
            .await;
        assert_eq!(
            dana_rx.try_recv().unwrap(),
            OutboundMessage::Matched {
                tutor: "erin".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_chat_between_identified_users() {
        let (manager, _) = manager();
        let (erin, mut erin_rx) = manager.open();
        let (dana, _dana_rx) = manager.open();

        manager
            .handle_inbound(&erin.id, r#"{"type":"join","username":"erin","role":"tutor"}"#)
            .await;
        manager
            .handle_inbound(&dana.id, r#"{"type":"join","username":"dana","role":"student"}"#)
            .await;
        manager
            .handle_inbound(
                &dana.id,
                r#"{"type":"chatMessage","sender":"dana","receiver":"erin","message":"hi"}"#,
            )
            .await;

        assert_eq!(
            erin_rx.try_recv().unwrap(),
            OutboundMessage::ChatMessage {
                sender: "dana".to_string(),
                message: "hi".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_chat_from_anonymous_connection_is_ignored() {
        let (manager, _) = manager();
        let (erin, mut erin_rx) = manager.open();
        let (anon, mut anon_rx) = manager.open();

        manager
            .handle_inbound(&erin.id, r#"{"type":"join","username":"erin","role":"tutor"}"#)
            .await;
        manager
            .handle_inbound(
                &anon.id,
                r#"{"type":"chatMessage","sender":"x","receiver":"erin","message":"hi"}"#,
            )
            .await;

        assert!(erin_rx.try_recv().is_err());
        assert!(anon_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_bad_frame_gets_error_and_stays_open() {
        let (manager, _) = manager();
        let (conn, mut rx) = manager.open();

        manager.handle_inbound(&conn.id, "not json").await;
        manager
            .handle_inbound(&conn.id, r#"{"type":"join","username":"","role":"tutor"}"#)
            .await;

        for _ in 0..2 {
            match rx.try_recv().unwrap() {
                OutboundMessage::Error { code, .. } => assert_eq!(code, "INVALID_MESSAGE"),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(conn.is_alive());
        assert_eq!(manager.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_close_removes_session() {
        let (manager, presence) = manager();
        let (conn, _rx) = manager.open();

        manager
            .handle_inbound(&conn.id, r#"{"type":"join","username":"erin","role":"tutor"}"#)
            .await;
        assert!(presence.lookup("erin").await.is_some());

        manager.close(&conn.id).await;
        assert!(presence.lookup("erin").await.is_none());
        assert_eq!(manager.connection_count(), 0);
        assert!(!conn.is_alive());
    }

    #[tokio::test]
    async fn test_username_kept_verbatim_for_relay() {
        let (manager, presence) = manager();
        let (erin, mut erin_rx) = manager.open();
        let (dana, _dana_rx) = manager.open();

        manager
            .handle_inbound(&erin.id, r#"{"type":"join","username":" erin ","role":"tutor"}"#)
            .await;
        manager
            .handle_inbound(&dana.id, r#"{"type":"join","username":"dana","role":"student"}"#)
            .await;
        assert!(presence.lookup(" erin ").await.is_some());
        assert!(presence.lookup("erin").await.is_none());

        manager
            .handle_inbound(
                &dana.id,
                r#"{"type":"chatMessage","sender":"dana","receiver":" erin ","message":"hi"}"#,
            )
            .await;
        assert_eq!(
            erin_rx.try_recv().unwrap(),
            OutboundMessage::ChatMessage {
                sender: "dana".to_string(),
                message: "hi".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_join_on_closed_connection_is_skipped() {
        let (manager, presence) = manager();
        let (conn, _rx) = manager.open();

        conn.mark_closed().await;
        manager
            .handle_inbound(&conn.id, r#"{"type":"join","username":"erin","role":"tutor"}"#)
            .await;

        assert!(presence.lookup("erin").await.is_none());
    }

    #[tokio::test]
    async fn test_close_after_close_all_drops_late_session() {
        let (manager, presence) = manager();
        let (conn, _rx) = manager.open();

        manager.close_all().await;
        // A join that was already past its liveness check when close_all ran.
        presence.join("erin", UserRole::Tutor, conn.clone()).await;
        assert!(presence.lookup("erin").await.is_some());

        manager.close(&conn.id).await;
        assert!(presence.lookup("erin").await.is_none());
        assert_eq!(manager.metrics.snapshot().connections_active, 0);
    }

    #[tokio::test]
    async fn test_close_all() {
        let (manager, presence) = manager();
        let (a, _a_rx) = manager.open();
        let (_b, _b_rx) = manager.open();
        manager
            .handle_inbound(&a.id, r#"{"type":"join","username":"erin","role":"tutor"}"#)
            .await;

        manager.close_all().await;
        assert_eq!(manager.connection_count(), 0);
        assert_eq!(presence.online_count().await, 0);
    }
}
