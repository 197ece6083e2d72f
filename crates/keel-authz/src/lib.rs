//! Keel authorization primitives shared by the console and directory service.
//!
//! # Purpose
//! Centralizes the permission model: the catalog of securable features, the
//! closed set of actions, per-role policy grids, and the dependency rules that
//! keep a grid structurally consistent while it is edited.
//!
//! # How it fits
//! The console edits one [`Policy`] per [`Role`] through the pure toggle
//! operations defined here; the directory service normalizes incoming grids
//! through the same rules before persisting them, so both sides agree on what
//! a well-formed grid looks like.
//!
//! # Key invariants
//! - Per feature, any granted non-`view` action implies `view` is granted.
//! - Toggle operations never mutate their input; they return a new grid.
//! - The dependency table is static data, consulted generically (no action is
//!   special-cased on the enable path).
//!
//! # Examples
//! ```rust
//! use keel_authz::{Action, FeatureKey, Policy};
//!
//! let policy = Policy::empty().apply_toggle(FeatureKey::Reports, Action::Export, true);
//! assert!(policy.is_allowed(FeatureKey::Reports, Action::View));
//! ```

mod action;
mod defaults;
mod error;
mod feature;
mod policy;
mod role;

pub use action::{ACTIONS, Action};
pub use defaults::{default_policies, default_policy};
pub use error::{AuthzError, AuthzResult};
pub use feature::{FEATURES, Feature, FeatureKey};
pub use policy::{Policy, SelectionState};
pub use role::{ROLES, Role};
