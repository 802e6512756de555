//! Q-Learning: off-policy temporal-difference control
//!
//! Each iteration performs one sampled transition and one update toward
//! `r + γ max_a' Q(s', a')`. Which state is updated, how the behaviour action
//! is picked and how large the step is are all set by
//! [`QLearningConfig`](super::QLearningConfig).

use ndarray::Array2;
use rand::{Rng, rngs::StdRng};
use tracing::{debug, info, trace};

use super::{
    build_rng,
    config::{QLearningConfig, StateSampling},
    q_table::QTable,
};
use crate::{
    Result,
    environment::EnvironmentModel,
    ports::{Learner, TrainingSummary},
    types::{ActionId, StateId},
};

/// Q-learning learner (off-policy TD control)
///
/// Learns Q* by always updating toward the maximum next-state value,
/// regardless of the action the behaviour policy takes next.
pub struct QLearningLearner<'a> {
    env: &'a EnvironmentModel,
    config: QLearningConfig,
    q_table: QTable,
    visits: Array2<u64>,
    rng: StdRng,
}

impl<'a> QLearningLearner<'a> {
    /// Create a Q-Learning learner with an all-zero value table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// if the configuration is invalid.
    pub fn new(env: &'a EnvironmentModel, config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            env,
            q_table: QTable::new(env.state_count(), env.action_count(), config.discount_factor),
            visits: Array2::zeros((env.state_count(), env.action_count())),
            rng: build_rng(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Number of updates applied to a pair so far.
    pub fn visits(&self, state: StateId, action: ActionId) -> u64 {
        self.visits[[state, action]]
    }

    fn behaviour_action(&mut self, state: StateId, iteration: usize) -> ActionId {
        let explore = self.config.exploration.random_probability(iteration);
        if self.rng.random::<f64>() < explore {
            self.rng.random_range(0..self.env.action_count())
        } else {
            self.q_table.greedy_action(state)
        }
    }

    fn run(&mut self) -> Result<TrainingSummary> {
        let env = self.env;
        let mut summary = TrainingSummary {
            learner: self.name().to_string(),
            ..Default::default()
        };
        info!(
            learner = %summary.learner,
            iterations = self.config.max_iterations,
            sampling = ?self.config.state_sampling,
            "starting training"
        );

        let mut state = env.random_non_terminal_state(&mut self.rng)?;
        summary.episodes = 1;
        // Steps taken since the last restart.
        let mut segment = 0usize;
        for iteration in 1..=self.config.max_iterations {
            let restart = match self.config.state_sampling {
                StateSampling::Uniform => iteration > 1,
                StateSampling::Trajectory { reset_interval } => {
                    env.is_terminal(state) || segment >= reset_interval
                }
            };
            if restart {
                if !env.is_terminal(state)
                    && matches!(self.config.state_sampling, StateSampling::Trajectory { .. })
                {
                    summary.truncated_episodes += 1;
                }
                state = env.random_non_terminal_state(&mut self.rng)?;
                summary.episodes += 1;
                segment = 0;
            }

            let action = self.behaviour_action(state, iteration);
            let next_state = env.sample_next(state, action, &mut self.rng)?;
            let reward = env.reward(state, action);

            let prior = self.visits[[state, action]];
            self.visits[[state, action]] = prior + 1;
            let alpha = self.config.learning_rate.rate(iteration, prior);
            let td_error = self
                .q_table
                .q_learning_update(state, action, reward, next_state, alpha);
            trace!(iteration, state, action, next_state, alpha, td_error, "q update");

            summary.total_steps += 1;
            summary.updates += 1;
            segment += 1;
            state = next_state;

            if iteration.is_multiple_of(1000) {
                debug!(iteration, restarts = summary.episodes, "q-learning progress");
            }
        }

        info!(
            learner = %summary.learner,
            iterations = summary.total_steps,
            restarts = summary.episodes,
            "training finished"
        );
        Ok(summary)
    }
}

impl Learner for QLearningLearner<'_> {
    fn name(&self) -> &str {
        "Q-Learning"
    }

    /// Run `max_iterations` single-transition updates.
    fn train(&mut self) -> Result<TrainingSummary> {
        self.run()
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }
}
