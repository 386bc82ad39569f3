//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let directory_status = match &state.db_pool {
        None => "in-memory".to_string(),
        Some(pool) => match pool.health_check().await {
            Ok(true) => "connected".to_string(),
            Ok(false) => "unreachable".to_string(),
            Err(e) => {
                warn!(error = %e, "Directory health check failed");
                "unreachable".to_string()
            }
        },
    };

    let status = if directory_status == "unreachable" {
        "degraded"
    } else {
        "ok"
    };

    let (realtime, online_users) = state.realtime.stats().await;

    Json(DetailedHealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        directory: state.config.database.provider.clone(),
        directory_status,
        ws_connections: state.realtime.connections.connection_count(),
        online_users,
        realtime,
    })
}
