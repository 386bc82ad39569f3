//! In-memory user directory using a Tokio `RwLock` for single-node runs and tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use tutorlink_core::error::AppError;
use tutorlink_core::result::AppResult;
use tutorlink_entity::user::{CreateUser, User, UserRole};

use crate::directory::UserDirectory;

/// User directory kept entirely in process memory.
///
/// Records are stored in insertion order, which doubles as the creation
/// order used to break ties. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the directory holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_role_and_grade(&self, role: UserRole, grade: i32) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.role == role && u.grade == grade)
            .cloned())
    }

    async fn find_any_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut matching: Vec<User> = users.iter().filter(|u| u.role == role).cloned().collect();
        // Stable sort keeps insertion order among equal grades.
        matching.sort_by_key(|u| u.grade);
        Ok(matching)
    }

    async fn find_lowest_grade_by_role(&self, role: UserRole) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        // Ties resolve to the first-inserted user.
        Ok(users
            .iter()
            .filter(|u| u.role == role)
            .min_by_key(|u| u.grade)
            .cloned())
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == data.username) {
            return Err(AppError::conflict("Username already exists."));
        }

        let user = User::from_create(data);
        debug!(user_id = %user.id, username = %user.username, "User stored in memory directory");
        users.push(user.clone());
        Ok(user)
    }
}
