//! Registration, login, and profile lookup.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use tutorlink_auth::jwt::{IssuedToken, JwtEncoder};
use tutorlink_auth::password::PasswordHasher;
use tutorlink_core::error::{AppError, ErrorKind};
use tutorlink_core::result::AppResult;
use tutorlink_database::UserDirectory;
use tutorlink_entity::user::{CreateUser, User, UserRole};

/// Validated registration input with a plaintext password.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Desired username.
    pub username: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Student or tutor.
    pub role: UserRole,
    /// Grade level.
    pub grade: i32,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// Signed token for subsequent requests.
    pub token: IssuedToken,
}

/// Handles account creation and credential checks.
#[derive(Clone)]
pub struct AccountService {
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    password_min_length: usize,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        password_min_length: usize,
    ) -> Self {
        Self {
            directory,
            hasher,
            encoder,
            password_min_length,
        }
    }

    /// Registers a new user.
    pub async fn register(&self, reg: Registration) -> AppResult<User> {
        let username = reg.username;
        if username.trim().is_empty() {
            return Err(AppError::validation("All fields are required."));
        }
        if reg.password.chars().count() < self.password_min_length.max(1) {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters.",
                self.password_min_length.max(1)
            )));
        }

        if self.directory.find_by_username(&username).await?.is_some() {
            return Err(AppError::validation("Username already exists."));
        }

        let password_hash = self.hasher.hash_password(&reg.password)?;
        let user = self
            .directory
            .create(CreateUser {
                username,
                password_hash,
                role: reg.role,
                grade: reg.grade,
            })
            .await
            .map_err(|e| match e.kind {
                // Lost a race with a concurrent registration.
                ErrorKind::Conflict => AppError::validation("Username already exists."),
                _ => e,
            })?;

        info!(
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            grade = user.grade,
            "User registered"
        );

        Ok(user)
    }

    /// Verifies credentials and issues a token.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResult> {
        let Some(user) = self.directory.find_by_username(username).await? else {
            warn!(username = %username, "Login for unknown user");
            return Err(AppError::validation("User not found. Please register."));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(username = %username, "Login with incorrect password");
            return Err(AppError::authentication("Incorrect password."));
        }

        let token = self.encoder.issue(&user)?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(LoginResult { user, token })
    }

    /// Looks up a user's profile by id.
    pub async fn profile(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.directory.find_by_id(user_id).await
    }
}
