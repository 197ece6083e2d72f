//! Wire types for the directory API, camelCase on the wire.
use chrono::{DateTime, Utc};
use keel_authz::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        })
    }
}

/// A directory user as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    /// Full display name; the service derives it from the stored name parts
    /// and falls back to the username.
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub last_password_reset_at: Option<DateTime<Utc>>,
    pub temp_password_last_set_at: Option<DateTime<Utc>>,
    pub must_change_password: bool,
}

/// Fields required to create a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub password: String,
}

/// Partial update; absent fields are left unchanged by the service.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Payload for setting a temporary password on an account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempPasswordRequest {
    pub password: String,
    pub expires_in_mins: u32,
    pub must_change: bool,
}

/// Expiry presets offered for temporary passwords, in minutes.
pub const TEMP_PASSWORD_EXPIRY_MINS: [u32; 3] = [60 * 24, 60 * 72, 60 * 24 * 7];
