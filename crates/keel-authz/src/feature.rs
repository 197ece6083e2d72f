use crate::error::AuthzError;
use serde::{Deserialize, Serialize};

/// Identifier of a securable feature. Closed set, ordered as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Users,
    Roles,
    Permissions,
    Products,
    Orders,
    Invoices,
    Reports,
}

/// A securable resource with its display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub key: FeatureKey,
    pub label: &'static str,
    pub description: Option<&'static str>,
}

/// The fixed feature catalog in display order.
pub const FEATURES: [Feature; 7] = [
    Feature {
        key: FeatureKey::Users,
        label: "Users",
        description: Some("Manage user accounts"),
    },
    Feature {
        key: FeatureKey::Roles,
        label: "Roles",
        description: Some("Role definitions"),
    },
    Feature {
        key: FeatureKey::Permissions,
        label: "Permissions",
        description: Some("Access policies"),
    },
    Feature {
        key: FeatureKey::Products,
        label: "Products",
        description: Some("Catalog items"),
    },
    Feature {
        key: FeatureKey::Orders,
        label: "Orders",
        description: Some("Sales orders"),
    },
    Feature {
        key: FeatureKey::Invoices,
        label: "Invoices",
        description: Some("Billing docs"),
    },
    Feature {
        key: FeatureKey::Reports,
        label: "Reports",
        description: Some("Operational reports"),
    },
];

impl FeatureKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKey::Users => "users",
            FeatureKey::Roles => "roles",
            FeatureKey::Permissions => "permissions",
            FeatureKey::Products => "products",
            FeatureKey::Orders => "orders",
            FeatureKey::Invoices => "invoices",
            FeatureKey::Reports => "reports",
        }
    }

    pub fn label(self) -> &'static str {
        match FEATURES.iter().find(|feature| feature.key == self) {
            Some(feature) => feature.label,
            None => self.as_str(),
        }
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureKey {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "users" => Ok(FeatureKey::Users),
            "roles" => Ok(FeatureKey::Roles),
            "permissions" => Ok(FeatureKey::Permissions),
            "products" => Ok(FeatureKey::Products),
            "orders" => Ok(FeatureKey::Orders),
            "invoices" => Ok(FeatureKey::Invoices),
            "reports" => Ok(FeatureKey::Reports),
            other => Err(AuthzError::UnknownFeature(other.to_string())),
        }
    }
}
