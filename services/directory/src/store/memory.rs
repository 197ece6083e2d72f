//! In-memory implementation of the directory store.
//!
//! # Purpose
//! Implements [`DirectoryStore`] entirely in memory using `HashMap`s guarded
//! by `tokio::sync::RwLock`. It exists for local development and tests, and
//! for deployments where durability is not required.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: mutations take write locks, so the
//!   uniqueness and last-admin checks observe a stable view.
//!
//! # Invariants owned here
//! - Usernames are unique, compared case-insensitively.
//! - The last user holding the admin role can neither be deleted nor demoted.
//! - Deleting a user revokes every token minted for them.
use super::{DirectoryStore, StoreError, StoreResult};
use crate::auth::password::PasswordHash;
use crate::model::{NewUserRecord, User, UserPatchRecord};
use async_trait::async_trait;
use chrono::Utc;
use keel_authz::{Policy, Role, default_policy};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct InMemoryStore {
    /// Authoritative user records keyed by id.
    users: Arc<RwLock<HashMap<u64, User>>>,
    /// Bearer token → user id.
    tokens: Arc<RwLock<HashMap<String, u64>>>,
    /// Saved policy grids; roles absent here serve their seeded default.
    policies: Arc<RwLock<BTreeMap<Role, Policy>>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            tokens: Arc::new(RwLock::new(HashMap::new())),
            policies: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn username_taken(users: &HashMap<u64, User>, username: &str, exclude: Option<u64>) -> bool {
    let needle = username.to_lowercase();
    users.values().any(|user| {
        Some(user.id) != exclude && user.username.to_lowercase() == needle
    })
}

fn admin_count(users: &HashMap<u64, User>) -> usize {
    users.values().filter(|user| user.role == Role::Admin).count()
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users.values().cloned().collect();
        items.sort_by_key(|user| user.id);
        Ok(items)
    }

    async fn get_user(&self, id: u64) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".into()))
    }

    async fn create_user(&self, record: NewUserRecord) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if username_taken(&users, &record.username, None) {
            return Err(StoreError::Conflict("username exists".into()));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let user = User {
            id,
            username: record.username,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            role: record.role,
            is_active: record.is_active,
            last_login: None,
            last_password_reset_at: None,
            temp_password_last_set_at: None,
            must_change_password: false,
            password: record.password,
        };
        users.insert(id, user.clone());
        metrics::gauge!("keel_directory_users_total").set(users.len() as f64);
        Ok(user)
    }

    async fn update_user(&self, id: u64, patch: UserPatchRecord) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if let Some(username) = &patch.username {
            if username_taken(&users, username, Some(id)) {
                return Err(StoreError::Conflict("username exists".into()));
            }
        }
        // Last-admin check under the same write lock as the mutation, so two
        // concurrent demotions cannot both pass it.
        {
            let current = users
                .get(&id)
                .ok_or_else(|| StoreError::NotFound("user".into()))?;
            let demoting = patch.role.is_some_and(|role| role != Role::Admin);
            if current.role == Role::Admin && demoting && admin_count(&users) <= 1 {
                return Err(StoreError::LastAdmin);
            }
        }
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(is_active) = patch.is_active {
            user.is_active = is_active;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: u64) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get(&id)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        if user.role == Role::Admin && admin_count(&users) <= 1 {
            return Err(StoreError::LastAdmin);
        }
        users.remove(&id);
        metrics::gauge!("keel_directory_users_total").set(users.len() as f64);
        drop(users);
        // A deleted user's sessions must not keep working.
        self.tokens.write().await.retain(|_, user_id| *user_id != id);
        Ok(())
    }

    async fn set_temp_password(
        &self,
        id: u64,
        password: PasswordHash,
        must_change: bool,
    ) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        user.password = password;
        user.temp_password_last_set_at = Some(Utc::now());
        user.must_change_password = must_change;
        Ok(user.clone())
    }

    async fn mark_password_reset(&self, id: u64) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        user.last_password_reset_at = Some(Utc::now());
        user.must_change_password = true;
        Ok(user.clone())
    }

    async fn login(&self, username: &str, password: &str) -> StoreResult<(String, User)> {
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|user| user.username == username)
            .ok_or(StoreError::InvalidCredentials)?;
        if !user.is_active || !user.password.verify(password) {
            return Err(StoreError::InvalidCredentials);
        }
        user.last_login = Some(Utc::now());
        let user = user.clone();
        drop(users);
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.write().await.insert(token.clone(), user.id);
        Ok((token, user))
    }

    async fn revoke_token(&self, token: &str) -> StoreResult<()> {
        let mut tokens = self.tokens.write().await;
        if tokens.remove(token).is_none() {
            return Err(StoreError::NotFound("token".into()));
        }
        Ok(())
    }

    async fn user_for_token(&self, token: &str) -> StoreResult<User> {
        let tokens = self.tokens.read().await;
        let user_id = tokens
            .get(token)
            .copied()
            .ok_or_else(|| StoreError::NotFound("token".into()))?;
        drop(tokens);
        self.get_user(user_id).await
    }

    async fn load_policy(&self, role: Role) -> StoreResult<Policy> {
        Ok(self
            .policies
            .read()
            .await
            .get(&role)
            .cloned()
            .unwrap_or_else(|| default_policy(role)))
    }

    async fn save_policy(&self, role: Role, policy: Policy) -> StoreResult<Policy> {
        self.policies.write().await.insert(role, policy.clone());
        metrics::counter!("keel_directory_policy_saves_total", "role" => role.as_str())
            .increment(1);
        Ok(policy)
    }

    async fn health_check(&self) -> StoreResult<()> {
        // In-memory backend is always "healthy" if the process is running.
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
