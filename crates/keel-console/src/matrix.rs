//! Permission matrix editor: the stateful shell around the policy engine.
//!
//! # Purpose
//! Holds one [`Policy`] per [`Role`] plus the selected role, and translates
//! edit gestures into the engine's pure toggle operations. Saving hands the
//! selected grid to a [`PolicySink`]; the editor adds no logic of its own on
//! that path.
use crate::config::ConsoleConfig;
use crate::error::ConsoleResult;
use crate::http::ApiClient;
use crate::session::Session;
use async_trait::async_trait;
use keel_authz::{Action, FeatureKey, Policy, Role, SelectionState, default_policies, default_policy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persistence collaborator for policy grids.
#[async_trait]
pub trait PolicySink {
    async fn save(&self, role: Role, policy: &Policy) -> ConsoleResult<()>;
}

/// In-memory editor state. Each role's grid is owned exclusively here; edits
/// replace the selected role's grid with the engine's result.
#[derive(Debug, Clone)]
pub struct MatrixEditor {
    policies: BTreeMap<Role, Policy>,
    selected: Role,
}

impl Default for MatrixEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixEditor {
    /// Editor seeded with every role's default grid, admin tab selected.
    pub fn new() -> Self {
        Self {
            policies: default_policies(),
            selected: Role::Admin,
        }
    }

    /// Editor over previously saved grids, e.g. fetched from the service.
    pub fn with_policies(policies: BTreeMap<Role, Policy>) -> Self {
        let mut editor = Self::new();
        for (role, policy) in policies {
            editor.policies.insert(role, policy);
        }
        editor
    }

    pub fn selected_role(&self) -> Role {
        self.selected
    }

    /// Pure view switch; no grid changes.
    pub fn select_role(&mut self, role: Role) {
        self.selected = role;
    }

    /// The selected role's grid.
    pub fn policy(&self) -> &Policy {
        self.policy_for(self.selected)
    }

    pub fn policy_for(&self, role: Role) -> &Policy {
        self.policies
            .get(&role)
            .unwrap_or_else(|| unreachable!("every role is seeded at construction"))
    }

    pub fn toggle_cell(&mut self, feature: FeatureKey, action: Action, value: bool) {
        let next = self.policy().apply_toggle(feature, action, value);
        self.policies.insert(self.selected, next);
    }

    pub fn toggle_row(&mut self, feature: FeatureKey, value: bool) {
        let next = self.policy().set_row(feature, value);
        self.policies.insert(self.selected, next);
    }

    pub fn toggle_column(&mut self, action: Action, value: bool) {
        let next = self.policy().set_column(action, value);
        self.policies.insert(self.selected, next);
    }

    /// Replace the selected role's grid with a fresh copy of its default.
    pub fn reset_role(&mut self) {
        self.policies
            .insert(self.selected, default_policy(self.selected));
    }

    /// Replace the selected role's grid with the all-cleared baseline.
    pub fn clear_role(&mut self) {
        self.policies.insert(self.selected, Policy::empty());
    }

    pub fn row_state(&self, feature: FeatureKey) -> SelectionState {
        self.policy().row_state(feature)
    }

    pub fn column_state(&self, action: Action) -> SelectionState {
        self.policy().column_state(action)
    }

    /// Persist the selected role's grid through the sink.
    pub async fn save<S: PolicySink + ?Sized>(&self, sink: &S) -> ConsoleResult<()> {
        sink.save(self.selected, self.policy()).await
    }
}

#[derive(Debug, Serialize)]
struct SavePolicyRequest<'a> {
    policy: &'a Policy,
}

#[derive(Debug, Deserialize)]
struct PolicyResponse {
    policy: Policy,
}

/// HTTP-backed [`PolicySink`] speaking to the directory service.
pub struct PermissionsClient {
    api: ApiClient,
}

impl PermissionsClient {
    pub fn new(config: &ConsoleConfig, session: &Session) -> ConsoleResult<Self> {
        let api = ApiClient::new(config)?.with_token(&session.token);
        Ok(Self { api })
    }

    /// Fetch the saved grid for one role (the seeded default until a save).
    pub async fn load(&self, role: Role) -> ConsoleResult<Policy> {
        let response: PolicyResponse = self.api.get(&format!("/v1/permissions/{role}")).await?;
        Ok(response.policy)
    }

    /// Fetch all roles' grids, e.g. to seed [`MatrixEditor::with_policies`].
    pub async fn load_all(&self) -> ConsoleResult<BTreeMap<Role, Policy>> {
        let mut policies = BTreeMap::new();
        for role in keel_authz::ROLES {
            policies.insert(role, self.load(role).await?);
        }
        Ok(policies)
    }
}

#[async_trait]
impl PolicySink for PermissionsClient {
    async fn save(&self, role: Role, policy: &Policy) -> ConsoleResult<()> {
        let _: PolicyResponse = self
            .api
            .put(
                &format!("/v1/permissions/{role}"),
                &SavePolicyRequest { policy },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MatrixEditor, PolicySink};
    use crate::error::ConsoleResult;
    use async_trait::async_trait;
    use keel_authz::{Action, FeatureKey, Policy, Role, SelectionState, default_policy};
    use std::sync::Mutex;

    #[test]
    fn starts_on_admin_with_seeded_defaults() {
        let editor = MatrixEditor::new();
        assert_eq!(editor.selected_role(), Role::Admin);
        assert_eq!(editor.policy(), &default_policy(Role::Admin));
    }

    #[test]
    fn selecting_a_role_changes_no_grid() {
        let mut editor = MatrixEditor::new();
        let admin_before = editor.policy().clone();
        editor.select_role(Role::Viewer);
        assert_eq!(editor.selected_role(), Role::Viewer);
        assert_eq!(editor.policy_for(Role::Admin), &admin_before);
        assert_eq!(editor.policy(), &default_policy(Role::Viewer));
    }

    #[test]
    fn edits_touch_only_the_selected_role() {
        let mut editor = MatrixEditor::new();
        editor.select_role(Role::Viewer);
        editor.toggle_cell(FeatureKey::Orders, Action::Create, true);
        assert!(editor.policy().is_allowed(FeatureKey::Orders, Action::Create));
        assert!(
            editor
                .policy_for(Role::Reviewer)
                .is_allowed(FeatureKey::Orders, Action::View)
        );
        assert!(
            !editor
                .policy_for(Role::Reviewer)
                .is_allowed(FeatureKey::Orders, Action::Create)
        );
    }

    #[test]
    fn reset_and_clear_swap_whole_grids() {
        let mut editor = MatrixEditor::new();
        editor.select_role(Role::Creator);
        editor.clear_role();
        assert_eq!(editor.policy(), &Policy::empty());
        assert_eq!(editor.row_state(FeatureKey::Orders), SelectionState::None);
        editor.reset_role();
        assert_eq!(editor.policy(), &default_policy(Role::Creator));
    }

    #[test]
    fn bulk_toggles_delegate_to_the_engine() {
        let mut editor = MatrixEditor::new();
        editor.select_role(Role::Viewer);
        editor.toggle_column(Action::Approve, true);
        assert!(editor.column_state(Action::Approve).is_all());
        editor.toggle_row(FeatureKey::Reports, false);
        assert_eq!(editor.row_state(FeatureKey::Reports), SelectionState::None);
    }

    struct RecordingSink {
        saves: Mutex<Vec<(Role, Policy)>>,
    }

    #[async_trait]
    impl PolicySink for RecordingSink {
        async fn save(&self, role: Role, policy: &Policy) -> ConsoleResult<()> {
            self.saves
                .lock()
                .expect("sink lock")
                .push((role, policy.clone()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn save_hands_the_selected_grid_to_the_sink() {
        let mut editor = MatrixEditor::new();
        editor.select_role(Role::Reviewer);
        editor.toggle_cell(FeatureKey::Invoices, Action::Approve, false);
        let sink = RecordingSink {
            saves: Mutex::new(Vec::new()),
        };
        editor.save(&sink).await.expect("save");
        let saves = sink.saves.lock().expect("sink lock");
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].0, Role::Reviewer);
        assert_eq!(&saves[0].1, editor.policy());
    }
}
