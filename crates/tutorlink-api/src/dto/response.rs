//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tutorlink_entity::user::{User, UserRole};
use tutorlink_realtime::metrics::MetricsSnapshot;
use tutorlink_service::MatchResult;

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Message.
    pub message: String,
    /// Bearer token.
    pub token: String,
}

/// Public profile of the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Role.
    pub role: UserRole,
    /// Grade.
    pub grade: i32,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            grade: user.grade,
        }
    }
}

/// Public view of a tutor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorResponse {
    /// Username.
    pub username: String,
    /// Grade.
    pub grade: i32,
}

/// Successful match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    /// Message.
    pub message: String,
    /// The selected tutor.
    pub tutor: TutorResponse,
}

impl From<MatchResult> for MatchResponse {
    fn from(result: MatchResult) -> Self {
        Self {
            message: "Tutor matched!".to_string(),
            tutor: TutorResponse {
                username: result.tutor_username,
                grade: result.tutor_grade,
            },
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Detailed health with realtime counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Directory provider name.
    pub directory: String,
    /// `"connected"`, `"unreachable"`, or `"in-memory"`.
    pub directory_status: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Identified users online.
    pub online_users: usize,
    /// Realtime counters.
    pub realtime: MetricsSnapshot,
}
