//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use tutorlink_core::config::RealtimeConfig;

use crate::connection::manager::ConnectionManager;
use crate::metrics::{MetricsSnapshot, RealtimeMetrics};
use crate::presence::registry::PresenceRegistry;
use crate::relay::chat::ChatRelay;

/// Central real-time engine shared by every WebSocket task.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Username to connection registry.
    pub presence: Arc<PresenceRegistry>,
    /// Chat relay.
    pub relay: Arc<ChatRelay>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: &RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RealtimeMetrics::new());
        let presence = Arc::new(PresenceRegistry::new());
        let relay = Arc::new(ChatRelay::new(presence.clone(), metrics.clone()));
        let connections = Arc::new(ConnectionManager::new(
            config.clone(),
            presence.clone(),
            relay.clone(),
            metrics.clone(),
        ));

        info!(
            channel_buffer_size = config.channel_buffer_size,
            "Real-time engine initialized"
        );

        Self {
            connections,
            presence,
            relay,
            metrics,
            shutdown_tx,
        }
    }

    /// Returns a shutdown receiver for socket tasks.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Counters plus the online session count.
    pub async fn stats(&self) -> (MetricsSnapshot, usize) {
        (self.metrics.snapshot(), self.presence.online_count().await)
    }

    /// Signals socket tasks to stop and closes every connection.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.connections.close_all().await;

        info!("Real-time engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_notifies_and_closes() {
        let engine = RealtimeEngine::new(&RealtimeConfig::default());
        let mut shutdown_rx = engine.shutdown_receiver();
        let (conn, _rx) = engine.connections.open();

        engine
            .connections
            .handle_inbound(&conn.id, r#"{"type":"join","username":"erin","role":"tutor"}"#)
            .await;
        let (snapshot, online) = engine.stats().await;
        assert_eq!(snapshot.joins, 1);
        assert_eq!(online, 1);

        engine.shutdown().await;
        assert!(shutdown_rx.recv().await.is_ok());
        assert_eq!(engine.connections.connection_count(), 0);
        assert_eq!(engine.stats().await.1, 0);
    }
}
