//! The user directory contract consumed by matching and accounts.

use async_trait::async_trait;
use uuid::Uuid;

use tutorlink_core::result::AppResult;
use tutorlink_entity::user::{CreateUser, User, UserRole};

/// Durable store of user records.
///
/// Lookups return `Ok(None)` for absent records; `Err` is reserved for
/// infrastructure failures such as an unreachable database.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find the first-created user with the given role and exact grade.
    async fn find_by_role_and_grade(&self, role: UserRole, grade: i32) -> AppResult<Option<User>>;

    /// All users with the given role, ascending by grade (ties in creation order).
    async fn find_any_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;

    /// Head of [`find_any_by_role`](Self::find_any_by_role) without loading the rest.
    async fn find_lowest_grade_by_role(&self, role: UserRole) -> AppResult<Option<User>>;

    /// Persist a new user. Fails with `Conflict` if the username is taken.
    async fn create(&self, data: CreateUser) -> AppResult<User>;
}
