use crate::error::AuthzError;
use serde::{Deserialize, Serialize};

/// Operations a role may be granted on a feature. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Approve,
    Export,
}

/// All actions in grid column order.
pub const ACTIONS: [Action; 6] = [
    Action::View,
    Action::Create,
    Action::Edit,
    Action::Delete,
    Action::Approve,
    Action::Export,
];

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Approve => "approve",
            Action::Export => "export",
        }
    }

    /// Actions that must be granted alongside this one.
    ///
    /// Static table, fixed at compile time. Currently single-level: every
    /// mutating action requires `view`, and `view` stands alone. Callers must
    /// iterate this table rather than hardcode `view` so deeper chains keep
    /// working if the table grows.
    pub fn dependencies(self) -> &'static [Action] {
        match self {
            Action::View => &[],
            Action::Create | Action::Edit | Action::Delete | Action::Approve | Action::Export => {
                &[Action::View]
            }
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Action::View),
            "create" => Ok(Action::Create),
            "edit" => Ok(Action::Edit),
            "delete" => Ok(Action::Delete),
            "approve" => Ok(Action::Approve),
            "export" => Ok(Action::Export),
            other => Err(AuthzError::UnknownAction(other.to_string())),
        }
    }
}
