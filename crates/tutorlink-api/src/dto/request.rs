//! Request DTOs with validation.
//!
//! Fields default to empty so a missing field surfaces as a validation
//! error (400) rather than a body rejection.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required."))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required."))]
    pub password: String,
    /// `"student"` or `"tutor"`.
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required."))]
    pub role: String,
    /// Grade level.
    #[validate(required(message = "All fields are required."))]
    pub grade: Option<i32>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required."))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required."))]
    pub password: String,
}

/// Query string for `GET /api/match-tutor`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchQuery {
    /// Student id, validated by the handler.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}
