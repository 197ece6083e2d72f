//! Per-role policy grids and the dependency-propagation rules that keep them
//! consistent while they are edited.
//!
//! # Purpose
//! A [`Policy`] is the full feature×action boolean grid for one role. All
//! editing operations are pure: they borrow the input grid and return a new
//! one, which keeps undo/reset trivial for callers and makes the operations
//! directly testable.
use crate::action::{ACTIONS, Action};
use crate::feature::{FEATURES, FeatureKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full authorization grid for one role: every feature × every action holds an
/// explicit flag, no missing entries.
///
/// # Invariants
/// - Grids produced by [`Policy::empty`] and the toggle operations always
///   cover the whole catalog.
/// - After any single toggle, a feature with a granted non-`view` action also
///   has `view` granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policy {
    grid: BTreeMap<FeatureKey, BTreeMap<Action, bool>>,
}

/// Derived state of a whole row or column, recomputed from the grid on every
/// read. Never stored, so it cannot drift from the flags it summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// Every flag in the row/column is granted.
    All,
    /// Some flags are granted, some are not.
    Partial,
    /// No flag in the row/column is granted.
    None,
}

impl SelectionState {
    fn from_counts(granted: usize, total: usize) -> Self {
        if granted == 0 {
            SelectionState::None
        } else if granted == total {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }

    pub fn is_all(self) -> bool {
        self == SelectionState::All
    }

    /// True when strictly between zero and all flags are granted, which is
    /// the "indeterminate" checkbox rendering.
    pub fn is_partial(self) -> bool {
        self == SelectionState::Partial
    }
}

impl Policy {
    /// Grid with every flag cleared. The "clear all" baseline.
    pub fn empty() -> Self {
        let mut grid = BTreeMap::new();
        for feature in FEATURES {
            let mut row = BTreeMap::new();
            for action in ACTIONS {
                row.insert(action, false);
            }
            grid.insert(feature.key, row);
        }
        Policy { grid }
    }

    pub fn is_allowed(&self, feature: FeatureKey, action: Action) -> bool {
        self.grid
            .get(&feature)
            .and_then(|row| row.get(&action))
            .copied()
            .unwrap_or(false)
    }

    fn set(&mut self, feature: FeatureKey, action: Action, value: bool) {
        self.grid.entry(feature).or_default().insert(action, value);
    }

    /// Apply a single toggle and propagate its dependency constraints.
    ///
    /// Enabling an action also enables everything in its dependency set for
    /// the same feature. Disabling an action also disables every action whose
    /// dependency set contains it. Both directions iterate the static table,
    /// so the rule stays correct if the table ever gains deeper chains.
    #[must_use]
    pub fn apply_toggle(&self, feature: FeatureKey, action: Action, value: bool) -> Policy {
        let mut next = self.clone();
        next.set(feature, action, value);
        if value {
            for dep in action.dependencies() {
                next.set(feature, *dep, true);
            }
        } else {
            for dependent in ACTIONS {
                if dependent.dependencies().contains(&action) {
                    next.set(feature, dependent, false);
                }
            }
        }
        next
    }

    /// Set every action of one feature to `value`.
    ///
    /// Enabling forces `view` on as well, which is already implied by setting
    /// every action, but guards the row rule against a future action that
    /// might be excluded from bulk selection.
    #[must_use]
    pub fn set_row(&self, feature: FeatureKey, value: bool) -> Policy {
        let mut next = self.clone();
        for action in ACTIONS {
            next.set(feature, action, value);
        }
        if value {
            next.set(feature, Action::View, true);
        }
        next
    }

    /// Set one action across every feature.
    ///
    /// Enabling also grants each feature's dependency set. Disabling `view`
    /// cascades to clear its dependents on every feature; disabling any other
    /// action touches only that column.
    #[must_use]
    pub fn set_column(&self, action: Action, value: bool) -> Policy {
        let mut next = self.clone();
        for feature in FEATURES {
            next.set(feature.key, action, value);
            if value {
                for dep in action.dependencies() {
                    next.set(feature.key, *dep, true);
                }
            } else {
                for dependent in ACTIONS {
                    if dependent.dependencies().contains(&action) {
                        next.set(feature.key, dependent, false);
                    }
                }
            }
        }
        next
    }

    pub fn row_state(&self, feature: FeatureKey) -> SelectionState {
        let granted = ACTIONS
            .iter()
            .filter(|action| self.is_allowed(feature, **action))
            .count();
        SelectionState::from_counts(granted, ACTIONS.len())
    }

    pub fn column_state(&self, action: Action) -> SelectionState {
        let granted = FEATURES
            .iter()
            .filter(|feature| self.is_allowed(feature.key, action))
            .count();
        SelectionState::from_counts(granted, FEATURES.len())
    }

    /// Whether every feature satisfies the dependency rule: any granted
    /// non-`view` action implies `view` is granted.
    pub fn is_consistent(&self) -> bool {
        FEATURES.iter().all(|feature| {
            ACTIONS.iter().all(|action| {
                !self.is_allowed(feature.key, *action)
                    || action
                        .dependencies()
                        .iter()
                        .all(|dep| self.is_allowed(feature.key, *dep))
            })
        })
    }

    /// Re-establish the dependency rule on an arbitrary grid by granting the
    /// dependency set of every granted action. Used when accepting grids from
    /// outside callers that may not have gone through the toggle operations.
    #[must_use]
    pub fn normalized(&self) -> Policy {
        let mut next = Policy::empty();
        for feature in FEATURES {
            for action in ACTIONS {
                if self.is_allowed(feature.key, action) {
                    next.set(feature.key, action, true);
                    for dep in action.dependencies() {
                        next.set(feature.key, *dep, true);
                    }
                }
            }
        }
        next
    }
}
