//! Learner port - common interface of the tabular learners
//!
//! Monte Carlo, SARSA and Q-Learning all own a value table and produce a
//! deterministic policy from it. This trait lets callers train and read them
//! without knowing which algorithm is behind it.

use serde::{Deserialize, Serialize};

use crate::{Result, codec::PolicyCodec, learning::QTable, policy::Policy};

/// Counters reported by a training call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Learner name
    pub learner: String,
    /// Episodes started (or restarts, for Q-Learning)
    pub episodes: usize,
    /// Environment transitions simulated
    pub total_steps: usize,
    /// Episodes cut off by a step cap before reaching a terminal state
    pub truncated_episodes: usize,
    /// Value-table updates applied
    pub updates: usize,
}

/// Learner trait - unified interface for the tabular algorithms
///
/// # Examples
///
/// ```no_run
/// use gridnav_rl::{Result, ports::Learner};
///
/// fn train_and_render(learner: &mut dyn Learner) -> Result<Vec<String>> {
///     learner.train()?;
///     learner.policy_labels()
/// }
/// ```
pub trait Learner {
    /// Get the learner's name.
    fn name(&self) -> &str;

    /// Run the configured training schedule.
    ///
    /// Value table and policy are updated in place; calling `train` again
    /// continues from the current estimates.
    fn train(&mut self) -> Result<TrainingSummary>;

    /// Current state-action value estimates.
    fn q_table(&self) -> &QTable;

    /// Policy the learner would act on now.
    ///
    /// # Default Implementation
    ///
    /// Greedy with respect to [`Learner::q_table`], ties to the lowest action.
    fn policy(&self) -> Policy {
        self.q_table().greedy_policy()
    }

    /// Policy rendered with the given codec, in ascending state order.
    fn policy_labels_with(&self, codec: &PolicyCodec) -> Result<Vec<String>> {
        codec.encode(self.policy().into_vec())
    }

    /// Policy rendered with the navigation labels.
    fn policy_labels(&self) -> Result<Vec<String>> {
        self.policy_labels_with(&PolicyCodec::navigation())
    }
}
