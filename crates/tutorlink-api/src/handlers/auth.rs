//! Auth handlers: register, login, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use tutorlink_core::error::AppError;
use tutorlink_entity::user::UserRole;
use tutorlink_service::Registration;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{LoginResponse, MessageResponse, ProfileResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let role: UserRole = req.role.parse()?;
    let grade = req
        .grade
        .ok_or_else(|| AppError::validation("All fields are required."))?;

    state
        .account_service
        .register(Registration {
            username: req.username,
            password: req.password,
            role,
            grade,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully!".to_string(),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let result = state
        .account_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful!".to_string(),
        token: result.token.token,
    }))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProfileResponse>> {
    let user = state
        .account_service
        .profile(auth.user_id())
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    Ok(Json(ProfileResponse::from(user)))
}
