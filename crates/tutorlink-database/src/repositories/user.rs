//! PostgreSQL user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tutorlink_core::error::{AppError, ErrorKind};
use tutorlink_core::result::AppResult;
use tutorlink_entity::user::{CreateUser, User, UserRole};

use crate::directory::UserDirectory;

/// Repository for user queries against the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Pool exhaustion is reported as unavailable; everything else is a database error.
fn query_error(context: &'static str, err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::PoolTimedOut => {
            AppError::service_unavailable(format!("{context}: connection pool exhausted"))
        }
        other => AppError::with_source(ErrorKind::Database, context, other),
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to find user by id", e))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to find user by username", e))
    }

    async fn find_by_role_and_grade(&self, role: UserRole, grade: i32) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 AND grade = $2 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(role)
        .bind(grade)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("Failed to find user by role and grade", e))
    }

    async fn find_any_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 ORDER BY grade ASC, created_at ASC",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("Failed to list users by role", e))
    }

    async fn find_lowest_grade_by_role(&self, role: UserRole) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 ORDER BY grade ASC, created_at ASC LIMIT 1",
        )
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("Failed to find lowest-grade user by role", e))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let user = User::from_create(data);

        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, username, password_hash, role, grade, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.grade)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::conflict("Username already exists.");
                }
            }
            query_error("Failed to create user", e)
        })
    }
}
