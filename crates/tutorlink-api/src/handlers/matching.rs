//! Tutor match handler.

use axum::Json;
use axum::extract::{Query, State};

use tutorlink_core::error::AppError;
use tutorlink_service::{MatchOutcome, MatchService};

use crate::dto::request::MatchQuery;
use crate::dto::response::MatchResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/match-tutor?userId={uuid}
pub async fn match_tutor(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> ApiResult<Json<MatchResponse>> {
    let student_id = MatchService::parse_student_id(query.user_id.as_deref())?;

    match state.match_service.match_student(student_id).await? {
        MatchOutcome::Matched(result) => Ok(Json(MatchResponse::from(result))),
        MatchOutcome::StudentNotFound => Err(AppError::not_found("Student not found.").into()),
        MatchOutcome::NoTutorAvailable => {
            Err(AppError::not_found("No available tutors at this time.").into())
        }
    }
}
