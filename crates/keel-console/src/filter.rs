use crate::types::{UserRecord, UserStatus};
use keel_authz::Role;

/// Directory list filters, combined by logical AND. Pure projection over the
/// cached list; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    /// Case-insensitive substring matched against username, name, and email.
    pub search: String,
    /// `None` means "all roles".
    pub role: Option<Role>,
    /// `None` means "all statuses".
    pub status: Option<UserStatus>,
}

impl UserFilter {
    pub fn matches(&self, user: &UserRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || user.username.to_lowercase().contains(&needle)
            || user.name.to_lowercase().contains(&needle)
            || user.email.to_lowercase().contains(&needle);
        let matches_role = self.role.is_none_or(|role| user.role == role);
        let matches_status = self.status.is_none_or(|status| user.status == status);
        matches_search && matches_role && matches_status
    }

    pub fn apply(&self, users: &[UserRecord]) -> Vec<UserRecord> {
        users
            .iter()
            .filter(|user| self.matches(user))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::UserFilter;
    use crate::types::{UserRecord, UserStatus};
    use keel_authz::Role;

    fn user(username: &str, name: &str, email: &str, role: Role, status: UserStatus) -> UserRecord {
        UserRecord {
            id: 0,
            username: username.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            status,
            last_login: None,
            last_password_reset_at: None,
            temp_password_last_set_at: None,
            must_change_password: false,
        }
    }

    fn sample() -> Vec<UserRecord> {
        vec![
            user(
                "acreed",
                "Ana Creed",
                "ana@example.com",
                Role::Creator,
                UserStatus::Active,
            ),
            user(
                "bjorn",
                "Bjorn Hale",
                "bjorn@example.com",
                Role::Creator,
                UserStatus::Inactive,
            ),
            user(
                "cress",
                "Cress Ito",
                "cress@example.com",
                Role::Viewer,
                UserStatus::Active,
            ),
            user(
                "dmars",
                "Dee Mars",
                "dee@example.com",
                Role::Admin,
                UserStatus::Active,
            ),
        ]
    }

    #[test]
    fn empty_filter_matches_everyone() {
        let filter = UserFilter::default();
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn search_is_case_insensitive_over_three_fields() {
        let filter = UserFilter {
            search: "CRE".to_string(),
            ..UserFilter::default()
        };
        let hits = filter.apply(&sample());
        // "acreed" (username), "Ana Creed" (name), "cress" (username/email).
        let usernames: Vec<_> = hits.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(usernames, vec!["acreed", "cress"]);
    }

    #[test]
    fn filters_combine_with_logical_and() {
        let filter = UserFilter {
            search: "cre".to_string(),
            role: None,
            status: Some(UserStatus::Active),
        };
        let hits = filter.apply(&sample());
        assert!(hits.iter().all(|u| u.status == UserStatus::Active));
        assert_eq!(hits.len(), 2);

        let narrowed = UserFilter {
            search: "cre".to_string(),
            role: Some(Role::Creator),
            status: Some(UserStatus::Active),
        };
        let hits = narrowed.apply(&sample());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "acreed");
    }

    #[test]
    fn role_filter_alone() {
        let filter = UserFilter {
            role: Some(Role::Admin),
            ..UserFilter::default()
        };
        let hits = filter.apply(&sample());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "dmars");
    }
}
