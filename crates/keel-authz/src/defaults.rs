//! Seeded per-role policy grids. Configuration data, not algorithm: these are
//! the grants a role starts with before an administrator edits anything.
use crate::action::Action;
use crate::feature::{FEATURES, FeatureKey};
use crate::policy::Policy;
use crate::role::{ROLES, Role};
use std::collections::BTreeMap;

/// The default grid for one role.
pub fn default_policy(role: Role) -> Policy {
    match role {
        Role::Admin => {
            // Administrators hold every grant.
            let mut policy = Policy::empty();
            for feature in FEATURES {
                policy = policy.set_row(feature.key, true);
            }
            policy
        }
        Role::Creator => {
            // Creators author content everywhere but neither delete, approve,
            // nor export outside of reports.
            let mut policy = Policy::empty();
            for feature in FEATURES {
                policy = policy
                    .apply_toggle(feature.key, Action::View, true)
                    .apply_toggle(feature.key, Action::Create, true)
                    .apply_toggle(feature.key, Action::Edit, true);
            }
            policy.apply_toggle(FeatureKey::Reports, Action::Export, true)
        }
        Role::Reviewer => {
            let mut policy = Policy::empty();
            for feature in FEATURES {
                policy = policy.apply_toggle(feature.key, Action::View, true);
                if feature.key != FeatureKey::Roles && feature.key != FeatureKey::Permissions {
                    policy = policy.apply_toggle(feature.key, Action::Approve, true);
                }
            }
            policy.apply_toggle(FeatureKey::Reports, Action::Export, true)
        }
        Role::Viewer => {
            let mut policy = Policy::empty();
            for feature in FEATURES {
                policy = policy.apply_toggle(feature.key, Action::View, true);
            }
            policy.apply_toggle(FeatureKey::Reports, Action::Export, true)
        }
    }
}

/// Default grids for every role, keyed by role.
pub fn default_policies() -> BTreeMap<Role, Policy> {
    ROLES
        .iter()
        .map(|role| (*role, default_policy(*role)))
        .collect()
}
