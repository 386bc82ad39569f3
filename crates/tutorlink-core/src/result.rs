//! Convenience result type alias for TutorLink.

use crate::error::AppError;

/// A specialized `Result` type for TutorLink operations.
pub type AppResult<T> = Result<T, AppError>;
