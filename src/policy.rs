//! Deterministic state -> action policies.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{ActionId, StateId},
};

/// One chosen action per state, indexed by state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    actions: Vec<ActionId>,
    action_count: usize,
}

impl Policy {
    /// Create a policy from an explicit action per state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownActionIndex`] if any entry is `>= action_count`.
    pub fn new(actions: Vec<ActionId>, action_count: usize) -> Result<Self> {
        if let Some(&index) = actions.iter().find(|&&a| a >= action_count) {
            return Err(Error::UnknownActionIndex {
                index,
                label_count: action_count,
            });
        }
        Ok(Self {
            actions,
            action_count,
        })
    }

    /// Caller guarantees every entry is `< action_count`.
    pub(crate) fn from_valid(actions: Vec<ActionId>, action_count: usize) -> Self {
        debug_assert!(actions.iter().all(|&a| a < action_count));
        Self {
            actions,
            action_count,
        }
    }

    /// Draw an action uniformly at random for every state.
    pub fn uniform_random<R: Rng + ?Sized>(
        state_count: usize,
        action_count: usize,
        rng: &mut R,
    ) -> Self {
        let actions = (0..state_count)
            .map(|_| rng.random_range(0..action_count))
            .collect();
        Self {
            actions,
            action_count,
        }
    }

    /// Action for `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range.
    pub fn action(&self, state: StateId) -> ActionId {
        self.actions[state]
    }

    /// Replace the action chosen in `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range or `action >= action_count`.
    pub fn set(&mut self, state: StateId, action: ActionId) {
        assert!(action < self.action_count, "action {action} out of range");
        self.actions[state] = action;
    }

    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    pub fn as_slice(&self) -> &[ActionId] {
        &self.actions
    }

    pub fn into_vec(self) -> Vec<ActionId> {
        self.actions
    }
}
