//! Grade-based tutor selection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tutorlink_core::result::AppResult;
use tutorlink_database::UserDirectory;
use tutorlink_entity::user::{User, UserRole};

/// Public view of a matched tutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Tutor's username.
    pub tutor_username: String,
    /// Tutor's grade.
    pub tutor_grade: i32,
}

impl From<&User> for MatchResult {
    fn from(tutor: &User) -> Self {
        Self {
            tutor_username: tutor.username.clone(),
            tutor_grade: tutor.grade,
        }
    }
}

/// Selects a tutor for a student from the user directory.
///
/// An exact grade match wins. Failing that, the tutor with the lowest grade
/// overall is returned, whatever its distance from the student's grade.
/// Callers must not read the fallback as the closest tutor.
#[derive(Clone)]
pub struct MatchEngine {
    directory: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine").finish()
    }
}

impl MatchEngine {
    /// Creates a new engine over the given directory.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Finds a tutor for `student`. `Ok(None)` means no tutor exists at all.
    pub async fn find_tutor(&self, student: &User) -> AppResult<Option<User>> {
        debug!(
            student = %student.username,
            grade = student.grade,
            "Finding tutor for student"
        );

        if let Some(tutor) = self
            .directory
            .find_by_role_and_grade(UserRole::Tutor, student.grade)
            .await?
        {
            info!(
                student = %student.username,
                tutor = %tutor.username,
                grade = tutor.grade,
                "Exact grade match"
            );
            return Ok(Some(tutor));
        }

        debug!(grade = student.grade, "No exact match, falling back to lowest-grade tutor");

        let fallback = self
            .directory
            .find_lowest_grade_by_role(UserRole::Tutor)
            .await?;

        match &fallback {
            Some(tutor) => info!(
                student = %student.username,
                tutor = %tutor.username,
                grade = tutor.grade,
                "Matched lowest-grade tutor"
            ),
            None => warn!(student = %student.username, "No tutors registered"),
        }

        Ok(fallback)
    }
}
