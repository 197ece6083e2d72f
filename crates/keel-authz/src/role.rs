use crate::error::AuthzError;
use serde::{Deserialize, Serialize};

/// Roles a directory user can hold. Exactly one policy grid exists per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Creator,
    Reviewer,
    Viewer,
}

/// All roles in tab order.
pub const ROLES: [Role; 4] = [Role::Admin, Role::Creator, Role::Reviewer, Role::Viewer];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Creator => "creator",
            Role::Reviewer => "reviewer",
            Role::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "creator" => Ok(Role::Creator),
            "reviewer" => Ok(Role::Reviewer),
            "viewer" => Ok(Role::Viewer),
            other => Err(AuthzError::UnknownRole(other.to_string())),
        }
    }
}
