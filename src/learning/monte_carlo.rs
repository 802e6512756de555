//! Monte Carlo control with return averaging
//!
//! Each episode is rolled out under the current policy (with an exploratory
//! first action), its discounted returns are appended to a per-pair buffer,
//! Q is set to the buffer mean and the visited state's policy entry is made
//! greedy.

use std::collections::HashSet;

use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use super::{
    build_rng,
    config::{MonteCarloConfig, VisitMode},
    q_table::QTable,
};
use crate::{
    Error, Result,
    environment::EnvironmentModel,
    episode::{Episode, EpisodeGenerator},
    policy::Policy,
    ports::{Learner, TrainingSummary},
    types::{ActionId, StateId},
};

/// Realised returns per (state, action), with running sums for the mean.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnsBuffer {
    returns: Vec<Vec<f64>>,
    sums: Vec<f64>,
    action_count: usize,
}

impl ReturnsBuffer {
    pub fn new(state_count: usize, action_count: usize) -> Self {
        let pairs = state_count * action_count;
        Self {
            returns: vec![Vec::new(); pairs],
            sums: vec![0.0; pairs],
            action_count,
        }
    }

    /// Append a return and get the new mean for the pair.
    pub fn push(&mut self, state: StateId, action: ActionId, value: f64) -> f64 {
        let idx = state * self.action_count + action;
        self.returns[idx].push(value);
        self.sums[idx] += value;
        self.sums[idx] / self.returns[idx].len() as f64
    }

    /// Returns recorded for a pair, oldest first.
    pub fn get(&self, state: StateId, action: ActionId) -> &[f64] {
        &self.returns[state * self.action_count + action]
    }
}

/// First-visit / every-visit Monte Carlo learner
pub struct MonteCarloLearner<'a> {
    env: &'a EnvironmentModel,
    config: MonteCarloConfig,
    policy: Policy,
    q_table: QTable,
    returns: ReturnsBuffer,
    rng: StdRng,
}

impl<'a> MonteCarloLearner<'a> {
    /// Create a learner starting from a uniformly random policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config is invalid.
    pub fn new(env: &'a EnvironmentModel, config: MonteCarloConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = build_rng(config.seed);
        let policy = Policy::uniform_random(env.state_count(), env.action_count(), &mut rng);
        Ok(Self {
            env,
            q_table: QTable::new(env.state_count(), env.action_count(), config.discount_factor),
            returns: ReturnsBuffer::new(env.state_count(), env.action_count()),
            config,
            policy,
            rng,
        })
    }

    /// Replace the starting policy with a caller-supplied one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the policy does not cover every
    /// state or was built for a different number of actions.
    pub fn with_initial_policy(mut self, policy: Policy) -> Result<Self> {
        if policy.state_count() != self.env.state_count() {
            return Err(Error::DimensionMismatch {
                what: "initial policy states".to_string(),
                expected: self.env.state_count(),
                got: policy.state_count(),
            });
        }
        if policy.action_count() != self.env.action_count() {
            return Err(Error::DimensionMismatch {
                what: "initial policy actions".to_string(),
                expected: self.env.action_count(),
                got: policy.action_count(),
            });
        }
        self.policy = policy;
        Ok(self)
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Returns recorded so far for one pair.
    pub fn returns(&self, state: StateId, action: ActionId) -> &[f64] {
        self.returns.get(state, action)
    }

    /// Train on `num_episodes + 1` episodes, crediting only the first
    /// occurrence of each (state, action) pair per episode.
    pub fn train_first_visit(&mut self, num_episodes: usize) -> Result<TrainingSummary> {
        self.run(num_episodes, VisitMode::FirstVisit)
    }

    /// Train on `num_episodes + 1` episodes, crediting every occurrence.
    pub fn train_every_visit(&mut self, num_episodes: usize) -> Result<TrainingSummary> {
        self.run(num_episodes, VisitMode::EveryVisit)
    }

    /// Apply the return updates of one already generated episode.
    ///
    /// Returns the number of (state, action) updates applied.
    pub fn learn_from_episode(&mut self, episode: &Episode, mode: VisitMode) -> usize {
        let gamma = self.config.discount_factor;
        let returns = episode.returns(gamma);
        let mut visited: HashSet<(StateId, ActionId)> = HashSet::new();
        let mut updates = 0;

        for (step, &g) in episode.steps().iter().zip(&returns) {
            if mode == VisitMode::FirstVisit && !visited.insert((step.state, step.action)) {
                continue;
            }
            let mean = self.returns.push(step.state, step.action, g);
            trace!(state = step.state, action = step.action, g, mean, "return recorded");
            self.q_table.set(step.state, step.action, mean);
            let greedy = self.q_table.greedy_action(step.state);
            self.policy.set(step.state, greedy);
            updates += 1;
        }
        updates
    }

    fn run(&mut self, num_episodes: usize, mode: VisitMode) -> Result<TrainingSummary> {
        let max_steps = self.config.max_episode_steps.unwrap_or(num_episodes);
        let mut summary = TrainingSummary {
            learner: self.name().to_string(),
            ..Default::default()
        };
        info!(
            learner = %summary.learner,
            ?mode,
            episodes = num_episodes + 1,
            max_steps,
            "starting training"
        );

        let generator = EpisodeGenerator::new(self.env);
        for index in 0..=num_episodes {
            let episode = generator.generate(&self.policy, max_steps, &mut self.rng)?;
            let updates = self.learn_from_episode(&episode, mode);

            summary.episodes += 1;
            summary.total_steps += episode.len();
            summary.updates += updates;
            if episode.truncated() {
                summary.truncated_episodes += 1;
            }
            debug!(
                episode = index,
                steps = episode.len(),
                truncated = episode.truncated(),
                updates,
                "episode complete"
            );
        }

        info!(
            learner = %summary.learner,
            episodes = summary.episodes,
            total_steps = summary.total_steps,
            truncated = summary.truncated_episodes,
            "training finished"
        );
        Ok(summary)
    }
}

impl Learner for MonteCarloLearner<'_> {
    fn name(&self) -> &str {
        "Monte Carlo"
    }

    fn train(&mut self) -> Result<TrainingSummary> {
        let episodes = self.config.episodes;
        self.run(episodes, self.config.visit_mode)
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// The maintained policy: greedy where a return has been seen, the
    /// initial choice elsewhere.
    fn policy(&self) -> Policy {
        self.policy.clone()
    }
}
