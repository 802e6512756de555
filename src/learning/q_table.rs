//! Dense state-action value table

use ndarray::{Array2, ArrayView1};

use crate::{
    policy::Policy,
    types::{ActionId, StateId},
};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Stored as a dense `(states, actions)` array initialised to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Array2<f64>,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a zero-initialised Q-table
    pub fn new(state_count: usize, action_count: usize, discount_factor: f64) -> Self {
        Self {
            values: Array2::zeros((state_count, action_count)),
            discount_factor,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: StateId, action: ActionId) -> f64 {
        self.values[[state, action]]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateId, action: ActionId, value: f64) {
        self.values[[state, action]] = value;
    }

    pub fn row(&self, state: StateId) -> ArrayView1<'_, f64> {
        self.values.row(state)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn state_count(&self) -> usize {
        self.values.nrows()
    }

    pub fn action_count(&self) -> usize {
        self.values.ncols()
    }

    /// Maximum Q-value over all actions in a state
    pub fn max_q(&self, state: StateId) -> f64 {
        self.values
            .row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action (highest Q-value); ties go to the lowest action index
    pub fn greedy_action(&self, state: StateId) -> ActionId {
        let mut best = 0;
        let mut best_q = f64::NEG_INFINITY;
        for (action, &q) in self.values.row(state).iter().enumerate() {
            if q > best_q {
                best = action;
                best_q = q;
            }
        }
        best
    }

    /// Greedy action for every state
    pub fn greedy_policy(&self) -> Policy {
        let actions = (0..self.state_count())
            .map(|s| self.greedy_action(s))
            .collect();
        Policy::from_valid(actions, self.action_count())
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Returns the TD error.
    pub fn q_learning_update(
        &mut self,
        state: StateId,
        action: ActionId,
        reward: f64,
        next_state: StateId,
        learning_rate: f64,
    ) -> f64 {
        let target = reward + self.discount_factor * self.max_q(next_state);
        self.apply_td(state, action, target, learning_rate)
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    ///
    /// Returns the TD error.
    pub fn sarsa_update(
        &mut self,
        state: StateId,
        action: ActionId,
        reward: f64,
        next_state: StateId,
        next_action: ActionId,
        learning_rate: f64,
    ) -> f64 {
        let target = reward + self.discount_factor * self.get(next_state, next_action);
        self.apply_td(state, action, target, learning_rate)
    }

    fn apply_td(&mut self, state: StateId, action: ActionId, target: f64, alpha: f64) -> f64 {
        let current = self.get(state, action);
        let td_error = target - current;
        self.set(state, action, current + alpha * td_error);
        td_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(4, 9, 0.9);
        assert_eq!(qtable.get(3, 8), 0.0);
        assert_eq!((qtable.state_count(), qtable.action_count()), (4, 9));
    }

    #[test]
    fn test_greedy_action_ties_pick_lowest_index() {
        let mut qtable = QTable::new(2, 9, 0.9);
        assert_eq!(qtable.greedy_action(0), 0);

        qtable.set(1, 3, 2.0);
        qtable.set(1, 7, 2.0);
        assert_eq!(qtable.greedy_action(1), 3);
        assert_eq!(qtable.greedy_policy().as_slice(), &[0, 3]);
    }

    #[test]
    fn test_greedy_action_all_negative() {
        let mut qtable = QTable::new(1, 3, 0.9);
        qtable.set(0, 0, -5.0);
        qtable.set(0, 1, -1.0);
        qtable.set(0, 2, -3.0);
        assert_eq!(qtable.greedy_action(0), 1);
        assert_eq!(qtable.max_q(0), -1.0);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(2, 3, 0.99);
        qtable.set(1, 1, 1.0);
        qtable.set(1, 2, 2.0);

        qtable.q_learning_update(0, 0, 0.0, 1, 0.5);

        // Q(0,0) = 0.0 + 0.5 * (0.0 + 0.99 * 2.0 - 0.0) = 0.99
        assert!((qtable.get(0, 0) - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_sarsa_update() {
        let mut qtable = QTable::new(2, 3, 0.99);
        qtable.set(1, 1, 1.5);

        let td_error = qtable.sarsa_update(0, 2, 1.0, 1, 1, 0.5);

        // target = 1.0 + 0.99 * 1.5 = 2.485
        assert!((td_error - 2.485).abs() < 1e-12);
        assert!((qtable.get(0, 2) - 1.2425).abs() < 1e-12);
    }
}
