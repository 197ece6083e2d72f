use crate::auth::password::PasswordHash;
use crate::model::{NewUserRecord, User, UserPatchRecord};
use async_trait::async_trait;
use keel_authz::{Policy, Role};
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("at least one admin account must remain")]
    LastAdmin,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend for the directory service.
///
/// The in-memory implementation backs development and tests; the trait is the
/// seam where a durable backend would slot in. Invariants that need the
/// store's own locking (username uniqueness, last-admin protection) live
/// behind this trait, not in handlers.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: u64) -> StoreResult<User>;
    async fn create_user(&self, record: NewUserRecord) -> StoreResult<User>;
    async fn update_user(&self, id: u64, patch: UserPatchRecord) -> StoreResult<User>;
    async fn delete_user(&self, id: u64) -> StoreResult<()>;
    async fn set_temp_password(
        &self,
        id: u64,
        password: PasswordHash,
        must_change: bool,
    ) -> StoreResult<User>;
    async fn mark_password_reset(&self, id: u64) -> StoreResult<User>;

    /// Verify credentials, stamp the login time, and mint a bearer token.
    async fn login(&self, username: &str, password: &str) -> StoreResult<(String, User)>;
    async fn revoke_token(&self, token: &str) -> StoreResult<()>;
    async fn user_for_token(&self, token: &str) -> StoreResult<User>;

    /// Saved policy for the role, or the seeded default before any save.
    async fn load_policy(&self, role: Role) -> StoreResult<Policy>;
    async fn save_policy(&self, role: Role, policy: Policy) -> StoreResult<Policy>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
