//! User directory client: CRUD against the directory API with a write-through
//! cache and local invariant guards.
//!
//! # Purpose
//! Backs the user-management table. The service is the authority; the cache
//! here is a mirror that only changes after the service confirms a mutation.
//! Two local guards reject doomed requests before they are issued: last-admin
//! protection and the one-mutation-per-record rule.
//!
//! # Key invariants
//! - No optimistic mutation: a failed request leaves the cache untouched.
//! - Deleting or demoting the only admin is rejected locally; the service
//!   enforces the same rule, so a stale cache still cannot break it.
//! - At most one mutation is in flight per record id at a time; mutations on
//!   different records are independent.
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::filter::UserFilter;
use crate::http::ApiClient;
use crate::session::Session;
use crate::types::{NewUser, TempPasswordRequest, UserPatch, UserRecord};
use crate::validate::{
    PasswordPolicy, validate_new_user, validate_patch_fields, validate_temp_password,
};
use keel_authz::Role;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct UserListResponse {
    items: Vec<UserRecord>,
}

pub struct DirectoryClient {
    api: ApiClient,
    password_policy: PasswordPolicy,
    cache: RwLock<Vec<UserRecord>>,
    in_flight: Mutex<HashSet<u64>>,
}

/// Releases the in-flight reservation for a record id when the mutation is
/// done, whichever way it ended.
#[derive(Debug)]
struct MutationGuard<'a> {
    in_flight: &'a Mutex<HashSet<u64>>,
    id: u64,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.in_flight.lock() {
            set.remove(&self.id);
        }
    }
}

impl DirectoryClient {
    pub fn new(config: &ConsoleConfig, session: &Session) -> ConsoleResult<Self> {
        let api = ApiClient::new(config)?.with_token(&session.token);
        Ok(Self {
            api,
            password_policy: PasswordPolicy::default(),
            cache: RwLock::new(Vec::new()),
            in_flight: Mutex::new(HashSet::new()),
        })
    }

    /// Replace the cache with the server's current list and return it.
    pub async fn refresh(&self) -> ConsoleResult<Vec<UserRecord>> {
        let response: UserListResponse = self.api.get("/v1/users").await?;
        let mut cache = self.cache.write().await;
        *cache = response.items.clone();
        Ok(response.items)
    }

    /// Snapshot of the cached list.
    pub async fn users(&self) -> Vec<UserRecord> {
        self.cache.read().await.clone()
    }

    /// Cached list narrowed by a filter.
    pub async fn filtered(&self, filter: &UserFilter) -> Vec<UserRecord> {
        filter.apply(&self.cache.read().await)
    }

    pub async fn admin_count(&self) -> usize {
        self.cache
            .read()
            .await
            .iter()
            .filter(|user| user.role == Role::Admin)
            .count()
    }

    pub async fn create(&self, draft: NewUser) -> ConsoleResult<UserRecord> {
        let existing: Vec<String> = {
            let cache = self.cache.read().await;
            cache
                .iter()
                .map(|user| user.username.to_lowercase())
                .collect()
        };
        validate_new_user(&draft, &existing, &self.password_policy)?;
        let created: UserRecord = self.api.post("/v1/users", &draft).await?;
        let mut cache = self.cache.write().await;
        cache.insert(0, created.clone());
        Ok(created)
    }

    pub async fn update(&self, id: u64, patch: UserPatch) -> ConsoleResult<UserRecord> {
        validate_patch_fields(patch.name.as_deref(), patch.email.as_deref())?;
        let current = self.cached_record(id).await?;
        let demoting = patch.role.is_some_and(|role| role != Role::Admin);
        if current.role == Role::Admin && demoting && self.admin_count().await <= 1 {
            return Err(ConsoleError::invariant(
                "You must keep at least one admin. Change another user first.",
            ));
        }
        if let Some(username) = &patch.username {
            let taken = {
                let cache = self.cache.read().await;
                let needle = username.trim().to_lowercase();
                cache
                    .iter()
                    .any(|user| user.id != id && user.username.to_lowercase() == needle)
            };
            if taken {
                return Err(ConsoleError::validation(
                    "username",
                    "Username already exists",
                ));
            }
        }
        let _guard = self.begin_mutation(id)?;
        let updated: UserRecord = self.api.patch(&format!("/v1/users/{id}"), &patch).await?;
        self.replace_cached(updated.clone()).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> ConsoleResult<()> {
        let current = self.cached_record(id).await?;
        if current.role == Role::Admin && self.admin_count().await <= 1 {
            return Err(ConsoleError::invariant(
                "You must keep at least one admin. This admin cannot be deleted.",
            ));
        }
        let _guard = self.begin_mutation(id)?;
        self.api.delete(&format!("/v1/users/{id}")).await?;
        let mut cache = self.cache.write().await;
        cache.retain(|user| user.id != id);
        Ok(())
    }

    pub async fn set_temp_password(
        &self,
        id: u64,
        request: TempPasswordRequest,
    ) -> ConsoleResult<UserRecord> {
        validate_temp_password(&request.password, &self.password_policy)?;
        let _guard = self.begin_mutation(id)?;
        let updated: UserRecord = self
            .api
            .post(&format!("/v1/users/{id}/temp-password"), &request)
            .await?;
        self.replace_cached(updated.clone()).await;
        Ok(updated)
    }

    pub async fn send_password_reset(&self, id: u64) -> ConsoleResult<UserRecord> {
        let _guard = self.begin_mutation(id)?;
        let updated: UserRecord = self
            .api
            .post(&format!("/v1/users/{id}/password-reset"), &serde_json::json!({}))
            .await?;
        self.replace_cached(updated.clone()).await;
        Ok(updated)
    }

    async fn cached_record(&self, id: u64) -> ConsoleResult<UserRecord> {
        self.cache
            .read()
            .await
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| {
                ConsoleError::invariant("User is not in the local cache; refresh the list first.")
            })
    }

    async fn replace_cached(&self, updated: UserRecord) {
        let mut cache = self.cache.write().await;
        match cache.iter_mut().find(|user| user.id == updated.id) {
            Some(slot) => *slot = updated,
            None => cache.insert(0, updated),
        }
    }

    fn begin_mutation(&self, id: u64) -> ConsoleResult<MutationGuard<'_>> {
        let mut set = self
            .in_flight
            .lock()
            .map_err(|_| ConsoleError::invariant("in-flight tracking poisoned"))?;
        if !set.insert(id) {
            return Err(ConsoleError::invariant(
                "Another change to this user is still in progress.",
            ));
        }
        Ok(MutationGuard {
            in_flight: &self.in_flight,
            id,
        })
    }
}
