//! Episode simulation shared by the Monte Carlo learner.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Error, Result,
    environment::EnvironmentModel,
    policy::Policy,
    types::{ActionId, StateId},
};

/// Fraction of `max_steps` after which an episode is cut off.
pub const EPISODE_STEP_FRACTION: f64 = 0.1;

/// One `(state, action, reward)` triple of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub state: StateId,
    pub action: ActionId,
    pub reward: f64,
}

/// A finite trajectory. The terminal state that ends it is never a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    steps: Vec<Step>,
    truncated: bool,
}

impl Episode {
    /// Build an episode from recorded steps.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            steps,
            truncated: false,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True if the step cap stopped the episode before it reached a terminal
    /// state.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Discounted return from every index:
    /// `G_t = sum_{i=t}^{T-1} gamma^(i-t) * reward_i`.
    pub fn returns(&self, gamma: f64) -> Vec<f64> {
        let mut returns = vec![0.0; self.steps.len()];
        let mut g = 0.0;
        for (t, step) in self.steps.iter().enumerate().rev() {
            g = step.reward + gamma * g;
            returns[t] = g;
        }
        returns
    }
}

/// Rolls out episodes in an [`EnvironmentModel`] under a behaviour policy.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeGenerator<'a> {
    env: &'a EnvironmentModel,
}

impl<'a> EpisodeGenerator<'a> {
    pub fn new(env: &'a EnvironmentModel) -> Self {
        Self { env }
    }

    /// Generate one episode.
    ///
    /// The start state is a uniformly random non-terminal state and the first
    /// action is uniformly random; after that `policy` picks the actions.
    /// The rollout stops on entering a terminal state, or once it has taken
    /// more than `EPISODE_STEP_FRACTION * max_steps` steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoNonTerminalState`] if no start state can be found,
    /// [`Error::DimensionMismatch`] if `policy` does not cover every state
    /// or was built for a different number of actions,
    /// and propagates [`Error::InvalidDistribution`] from sampling.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        policy: &Policy,
        max_steps: usize,
        rng: &mut R,
    ) -> Result<Episode> {
        let env = self.env;
        if policy.state_count() != env.state_count() {
            return Err(Error::DimensionMismatch {
                what: "policy states".to_string(),
                expected: env.state_count(),
                got: policy.state_count(),
            });
        }
        if policy.action_count() != env.action_count() {
            return Err(Error::DimensionMismatch {
                what: "policy actions".to_string(),
                expected: env.action_count(),
                got: policy.action_count(),
            });
        }

        let step_cap = EPISODE_STEP_FRACTION * max_steps as f64;
        let mut state = env.random_non_terminal_state(rng)?;
        let mut action = rng.random_range(0..env.action_count());
        let mut reward = env.reward(state, action);

        let mut episode = Episode::default();
        let mut taken = 0usize;
        while !env.is_terminal(state) {
            episode.steps.push(Step {
                state,
                action,
                reward,
            });
            state = env.sample_next(state, action, rng)?;
            action = policy.action(state);
            reward = env.reward(state, action);
            taken += 1;

            if taken as f64 > step_cap {
                episode.truncated = !env.is_terminal(state);
                break;
            }
        }

        trace!(
            steps = episode.len(),
            truncated = episode.truncated,
            "generated episode"
        );
        Ok(episode)
    }
}
