//! Match request handling: resolves the student record and runs the engine.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use tutorlink_core::error::AppError;
use tutorlink_core::result::AppResult;
use tutorlink_database::UserDirectory;

use super::engine::{MatchEngine, MatchResult};

/// Result of a match request. Every variant is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A tutor was selected.
    Matched(MatchResult),
    /// No user record exists for the requested id.
    StudentNotFound,
    /// The directory holds no tutors at all.
    NoTutorAvailable,
}

/// Serves match requests keyed by student id.
#[derive(Clone)]
pub struct MatchService {
    directory: Arc<dyn UserDirectory>,
    engine: MatchEngine,
}

impl std::fmt::Debug for MatchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchService")
            .field("engine", &self.engine)
            .finish()
    }
}

impl MatchService {
    /// Creates a new match service.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        let engine = MatchEngine::new(Arc::clone(&directory));
        Self { directory, engine }
    }

    /// Parses a client-supplied student identifier.
    ///
    /// Fails with a validation error before any directory access.
    pub fn parse_student_id(raw: Option<&str>) -> AppResult<Uuid> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| AppError::validation("Invalid user ID format."))
    }

    /// Matches the student with the given id to a tutor.
    ///
    /// Returns a validation error if the user exists but is not a student.
    pub async fn match_student(&self, student_id: Uuid) -> AppResult<MatchOutcome> {
        let Some(student) = self.directory.find_by_id(student_id).await? else {
            warn!(student_id = %student_id, "Student not found");
            return Ok(MatchOutcome::StudentNotFound);
        };

        if !student.is_student() {
            warn!(username = %student.username, role = %student.role, "User is not a student");
            return Err(AppError::validation("Invalid student role."));
        }

        match self.engine.find_tutor(&student).await? {
            Some(tutor) => {
                info!(
                    tutor = %tutor.username,
                    student = %student.username,
                    "Tutor matched"
                );
                Ok(MatchOutcome::Matched(MatchResult::from(&tutor)))
            }
            None => Ok(MatchOutcome::NoTutorAvailable),
        }
    }
}
