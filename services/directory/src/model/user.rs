//! User model definitions and the API view payload.
//!
//! # Purpose
//! `User` is the authoritative record the store owns, including the password
//! digest; `UserView` is what the API returns, with the derived `name` and
//! `status` fields the console renders.
use crate::auth::password::PasswordHash;
use chrono::{DateTime, Utc};
use keel_authz::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authoritative user record. Never serialized directly; the password digest
/// stays behind the store boundary.
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub last_password_reset_at: Option<DateTime<Utc>>,
    pub temp_password_last_set_at: Option<DateTime<Utc>>,
    pub must_change_password: bool,
    pub password: PasswordHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserStatus {
    Active,
    Inactive,
}

/// API payload for a user, camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: u64,
    pub username: String,
    /// Full name assembled from the stored parts, falling back to the
    /// username when both parts are empty.
    pub name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: Role,
    pub status: UserStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub last_password_reset_at: Option<DateTime<Utc>>,
    pub temp_password_last_set_at: Option<DateTime<Utc>>,
    pub must_change_password: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            name: self.display_name(),
            email: self.email.clone(),
            role: self.role,
            status: if self.is_active {
                UserStatus::Active
            } else {
                UserStatus::Inactive
            },
            last_login: self.last_login,
            last_password_reset_at: self.last_password_reset_at,
            temp_password_last_set_at: self.temp_password_last_set_at,
            must_change_password: self.must_change_password,
        }
    }
}

/// Fields the store needs to create a user. The API layer has already
/// validated shapes and hashed the password.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub password: PasswordHash,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatchRecord {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    fn user() -> User {
        User {
            id: 1,
            username: "mira".to_string(),
            first_name: "Mira".to_string(),
            last_name: "Vance".to_string(),
            email: "mira@example.com".to_string(),
            role: Role::Viewer,
            is_active: true,
            last_login: None,
            last_password_reset_at: None,
            temp_password_last_set_at: None,
            must_change_password: false,
            password: hash_password("Str0ng!pass"),
        }
    }

    #[test]
    fn view_derives_name_and_status() {
        let record = user();
        let view = record.view();
        assert_eq!(view.name, "Mira Vance");
        assert_eq!(view.status, UserStatus::Active);
    }

    #[test]
    fn view_falls_back_to_username_when_name_parts_empty() {
        let mut record = user();
        record.first_name.clear();
        record.last_name.clear();
        record.is_active = false;
        let view = record.view();
        assert_eq!(view.name, "mira");
        assert_eq!(view.status, UserStatus::Inactive);
    }

    #[test]
    fn view_serializes_camel_case() {
        let value = serde_json::to_value(user().view()).expect("serialize");
        assert!(value.get("mustChangePassword").is_some());
        assert!(value.get("lastLogin").is_some());
        assert_eq!(value["role"], serde_json::json!("viewer"));
        assert_eq!(value["status"], serde_json::json!("Active"));
    }
}
