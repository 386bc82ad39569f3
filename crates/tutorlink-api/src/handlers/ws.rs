//! WebSocket upgrade handler.
//!
//! Connections are anonymous until the client sends `join`; identity is the
//! one the client claims.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{error, info, warn};

use crate::state::AppState;

/// GET /ws
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let connections = state.realtime.connections.clone();
    let (handle, mut outbound_rx) = connections.open();
    let conn_id = handle.id;
    let mut shutdown_rx = state.realtime.shutdown_receiver();

    info!(conn_id = %conn_id, "WebSocket connection established");

    // Spawn outbound message forwarder
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(t) => t,
                Err(e) => {
                    error!(conn_id = %conn_id, error = %e, "Failed to serialize outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    connections.handle_inbound(&conn_id, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = shutdown_rx.recv() => break,
        }
    }

    // Cleanup
    outbound_task.abort();
    connections.close(&conn_id).await;

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
