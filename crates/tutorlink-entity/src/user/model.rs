//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered student or tutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name, also the presence key in chat.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Student or tutor.
    pub role: UserRole,
    /// School grade the student is in, or the tutor teaches.
    pub grade: i32,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a fresh record from creation data, assigning id and timestamps.
    pub fn from_create(data: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            role: data.role,
            grade: data.grade,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this user is a student.
    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    /// Check if this user is a tutor.
    pub fn is_tutor(&self) -> bool {
        self.role == UserRole::Tutor
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
    /// Grade level.
    pub grade: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::from_create(CreateUser {
            username: "erin".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Tutor,
            grade: 5,
        });

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "tutor");
        assert_eq!(json["grade"], 5);
        assert!(user.is_tutor());
        assert!(!user.is_student());
    }
}
