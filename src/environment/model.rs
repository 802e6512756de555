//! Immutable MDP model: transitions, rewards and the terminal predicate.

use ndarray::Array2;
use rand::Rng;
use tracing::trace;

use super::transitions::TransitionTensor;
use crate::{
    Error, Result,
    types::{ActionId, StateId},
};

/// Allowed deviation of a transition row sum from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Start-state rejection sampling gives up after `state_count` times this
/// many draws.
pub const START_STATE_ATTEMPTS_PER_STATE: usize = 100;

/// Tabular MDP with `transitions[a][s][s']` and `rewards[s][a]`.
///
/// A state is terminal iff its reward row sums to exactly zero. The terminal
/// mask is computed once at construction; the model is never mutated after.
#[derive(Debug, Clone)]
pub struct EnvironmentModel {
    transitions: TransitionTensor,
    rewards: Array2<f64>,
    terminal: Vec<bool>,
    state_count: usize,
    action_count: usize,
}

impl EnvironmentModel {
    /// Create a model from a transition tensor and a `(states, actions)`
    /// reward matrix.
    ///
    /// Row distributions are not checked here; a malformed row surfaces as
    /// [`Error::InvalidDistribution`] the first time it is sampled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the reward matrix shape does
    /// not match the transition tensor, or a transition matrix is not square.
    pub fn new(transitions: TransitionTensor, rewards: Array2<f64>) -> Result<Self> {
        let (state_count, action_count) = transitions.dimensions();
        transitions.check_square()?;

        let (reward_states, reward_actions) = rewards.dim();
        if reward_states != state_count {
            return Err(Error::DimensionMismatch {
                what: "reward matrix rows (states)".to_string(),
                expected: state_count,
                got: reward_states,
            });
        }
        if reward_actions != action_count {
            return Err(Error::DimensionMismatch {
                what: "reward matrix columns (actions)".to_string(),
                expected: action_count,
                got: reward_actions,
            });
        }

        let terminal = rewards.rows().into_iter().map(|row| row.sum() == 0.0).collect();

        Ok(Self {
            transitions,
            rewards,
            terminal,
            state_count,
            action_count,
        })
    }

    /// Convenience constructor from nested vectors.
    ///
    /// `transitions` is indexed `[action][state][next_state]` and `rewards`
    /// `[state][action]`.
    pub fn from_nested(transitions: Vec<Vec<Vec<f64>>>, rewards: Vec<Vec<f64>>) -> Result<Self> {
        let transitions = TransitionTensor::from_nested(transitions)?;
        let rows = rewards.len();
        let cols = rewards.first().map(Vec::len).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows * cols);
        for (state, row) in rewards.into_iter().enumerate() {
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    what: format!("reward row for state {state}"),
                    expected: cols,
                    got: row.len(),
                });
            }
            flat.extend(row);
        }
        let len = flat.len();
        let rewards =
            Array2::from_shape_vec((rows, cols), flat).map_err(|_| Error::DimensionMismatch {
                what: "reward matrix".to_string(),
                expected: rows * cols,
                got: len,
            })?;
        Self::new(transitions, rewards)
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    pub fn transitions(&self) -> &TransitionTensor {
        &self.transitions
    }

    pub fn rewards(&self) -> &Array2<f64> {
        &self.rewards
    }

    /// True iff the reward row of `state` sums to exactly zero.
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range.
    pub fn is_terminal(&self, state: StateId) -> bool {
        self.terminal[state]
    }

    /// Number of states that are not terminal.
    pub fn non_terminal_count(&self) -> usize {
        self.terminal.iter().filter(|&&t| !t).count()
    }

    /// Immediate reward for taking `action` in `state`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn reward(&self, state: StateId, action: ActionId) -> f64 {
        self.rewards[[state, action]]
    }

    /// Draw the next state from the categorical distribution
    /// `transitions[action][state]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] or [`Error::UnknownActionIndex`] for
    /// bad indices, and [`Error::InvalidDistribution`] if the row has a
    /// negative entry or does not sum to 1 within [`PROBABILITY_TOLERANCE`].
    pub fn sample_next<R: Rng + ?Sized>(
        &self,
        state: StateId,
        action: ActionId,
        rng: &mut R,
    ) -> Result<StateId> {
        self.check_state(state)?;
        if action >= self.action_count {
            return Err(Error::UnknownActionIndex {
                index: action,
                label_count: self.action_count,
            });
        }

        let row = self.transitions.row(action, state);
        let sum: f64 = row.sum();
        let malformed = row.iter().any(|&p| p < 0.0 || !p.is_finite());
        if malformed || (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(Error::InvalidDistribution { action, state, sum });
        }

        let ticket = rng.random::<f64>() * sum;
        let mut cumulative = 0.0;
        let mut last_supported = state;
        for (next, &p) in row.iter().enumerate() {
            if p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_supported = next;
            if ticket < cumulative {
                trace!(state, action, next, "sampled transition");
                return Ok(next);
            }
        }
        // Rounding left the ticket past the final bucket.
        Ok(last_supported)
    }

    /// Draw a uniformly random non-terminal state by rejection sampling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoNonTerminalState`] once
    /// `state_count * START_STATE_ATTEMPTS_PER_STATE` draws have all landed on
    /// terminal states (always the case when every state is terminal).
    pub fn random_non_terminal_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<StateId> {
        let attempts = self.state_count * START_STATE_ATTEMPTS_PER_STATE;
        for _ in 0..attempts {
            let state = rng.random_range(0..self.state_count);
            if !self.terminal[state] {
                return Ok(state);
            }
        }
        Err(Error::NoNonTerminalState { attempts })
    }

    pub(crate) fn check_state(&self, state: StateId) -> Result<()> {
        if state < self.state_count {
            Ok(())
        } else {
            Err(Error::StateOutOfRange {
                state,
                state_count: self.state_count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use ndarray::{Array3, array};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn three_state_model() -> EnvironmentModel {
        // Action 0 stays, action 1 moves right with 0.8 / stays with 0.2.
        EnvironmentModel::from_nested(
            vec![
                vec![
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 1.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                ],
                vec![
                    vec![0.2, 0.8, 0.0],
                    vec![0.0, 0.2, 0.8],
                    vec![0.0, 0.0, 1.0],
                ],
            ],
            vec![vec![-1.0, -2.0], vec![-1.0, 1.0], vec![0.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_terminal_is_zero_reward_sum() {
        let model = three_state_model();
        assert!(!model.is_terminal(0));
        // -1 + 1 == 0, so state 1 is terminal even though rewards are nonzero.
        assert!(model.is_terminal(1));
        assert!(model.is_terminal(2));
        assert_eq!(model.is_terminal(0), model.is_terminal(0));
        assert_eq!(model.non_terminal_count(), 1);
    }

    #[test]
    fn test_dimensions_from_both_layouts() {
        let model = three_state_model();
        assert_eq!((model.state_count(), model.action_count()), (3, 2));

        let mut dense = Array3::<f64>::zeros((2, 3, 3));
        for a in 0..2 {
            for s in 0..3 {
                for (n, &p) in model.transitions().row(a, s).iter().enumerate() {
                    dense[[a, s, n]] = p;
                }
            }
        }
        let dense_model =
            EnvironmentModel::new(TransitionTensor::Dense(dense), model.rewards().clone())
                .unwrap();
        assert_eq!(
            (dense_model.state_count(), dense_model.action_count()),
            (3, 2)
        );
    }

    #[test]
    fn test_reward_shape_mismatch() {
        let err = EnvironmentModel::new(
            TransitionTensor::PerAction(vec![array![[1.0, 0.0], [0.0, 1.0]]]),
            array![[1.0, 2.0], [3.0, 4.0]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 1, got: 2, .. }));
    }

    #[test]
    fn test_sample_next_follows_distribution() {
        let model = three_state_model();
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let moved = (0..n)
            .filter(|_| model.sample_next(0, 1, &mut rng).unwrap() == 1)
            .count();
        assert_float_eq!(moved as f64 / n as f64, 0.8, abs <= 0.02);
        assert_eq!(model.sample_next(2, 1, &mut rng).unwrap(), 2);
    }

    #[test]
    fn test_sample_next_rejects_bad_rows() {
        let mut rng = StdRng::seed_from_u64(1);
        let unnormalised = EnvironmentModel::from_nested(
            vec![vec![vec![0.5, 0.4], vec![0.0, 1.0]]],
            vec![vec![1.0], vec![0.0]],
        )
        .unwrap();
        assert!(matches!(
            unnormalised.sample_next(0, 0, &mut rng),
            Err(Error::InvalidDistribution { action: 0, state: 0, .. })
        ));

        let negative = EnvironmentModel::from_nested(
            vec![vec![vec![1.5, -0.5], vec![0.0, 1.0]]],
            vec![vec![1.0], vec![0.0]],
        )
        .unwrap();
        assert!(matches!(
            negative.sample_next(0, 0, &mut rng),
            Err(Error::InvalidDistribution { .. })
        ));

        assert!(matches!(
            negative.sample_next(5, 0, &mut rng),
            Err(Error::StateOutOfRange { state: 5, state_count: 2 })
        ));
    }

    #[test]
    fn test_random_non_terminal_state() {
        let model = three_state_model();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(model.random_non_terminal_state(&mut rng).unwrap(), 0);
        }

        let all_terminal = EnvironmentModel::from_nested(
            vec![vec![vec![1.0, 0.0], vec![0.0, 1.0]]],
            vec![vec![0.0], vec![0.0]],
        )
        .unwrap();
        assert_eq!(
            all_terminal.random_non_terminal_state(&mut rng),
            Err(Error::NoNonTerminalState { attempts: 200 })
        );
    }
}
