//! SARSA: on-policy temporal-difference control

use rand::{Rng, rngs::StdRng};
use tracing::{debug, info, trace};

use super::{build_rng, config::SarsaConfig, q_table::QTable};
use crate::{
    Result,
    environment::EnvironmentModel,
    ports::{Learner, TrainingSummary},
    types::{ActionId, StateId},
};

/// SARSA learner (on-policy TD control)
///
/// Learns Q^π for the ε-greedy policy it follows, bootstrapping each update
/// from the action actually chosen in the next state.
pub struct SarsaLearner<'a> {
    env: &'a EnvironmentModel,
    config: SarsaConfig,
    q_table: QTable,
    rng: StdRng,
}

impl<'a> SarsaLearner<'a> {
    /// Create a SARSA learner with an all-zero value table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// if γ, α or ε is outside `(0, 1]`.
    pub fn new(env: &'a EnvironmentModel, config: SarsaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            env,
            q_table: QTable::new(env.state_count(), env.action_count(), config.discount_factor),
            rng: build_rng(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &SarsaConfig {
        &self.config
    }

    /// ε-greedy action selection
    ///
    /// Random with probability ε, otherwise the greedy action with ties going
    /// to the lowest index.
    pub fn select_action(&mut self, state: StateId) -> ActionId {
        if self.rng.random::<f64>() < self.config.epsilon {
            self.rng.random_range(0..self.env.action_count())
        } else {
            self.q_table.greedy_action(state)
        }
    }

    fn run(&mut self) -> Result<TrainingSummary> {
        let env = self.env;
        let alpha = self.config.learning_rate;
        let episodes = self.config.max_iterations + 1;
        let interval = self.config.safety_cap.interval(self.config.max_iterations);
        let mut summary = TrainingSummary {
            learner: self.name().to_string(),
            ..Default::default()
        };
        info!(
            learner = %summary.learner,
            episodes,
            safety_interval = interval,
            "starting training"
        );

        // Cumulative across episodes; an episode ends whenever it hits a
        // multiple of the interval.
        let mut counter = 0usize;
        for index in 0..episodes {
            let mut state = env.random_non_terminal_state(&mut self.rng)?;
            let mut action = self.select_action(state);
            let mut steps = 0usize;

            while !env.is_terminal(state) {
                let next_state = env.sample_next(state, action, &mut self.rng)?;
                let reward = env.reward(state, action);
                let next_action = self.select_action(next_state);
                let td_error = self.q_table.sarsa_update(
                    state,
                    action,
                    reward,
                    next_state,
                    next_action,
                    alpha,
                );
                trace!(state, action, next_state, next_action, td_error, "sarsa update");

                state = next_state;
                action = next_action;
                steps += 1;
                counter += 1;
                if counter.is_multiple_of(interval) {
                    if !env.is_terminal(state) {
                        summary.truncated_episodes += 1;
                    }
                    break;
                }
            }

            summary.episodes += 1;
            summary.total_steps += steps;
            summary.updates += steps;
            debug!(episode = index, steps, "episode complete");
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

impl Learner for SarsaLearner<'_> {
    fn name(&self) -> &str {
        "SARSA"
    }

    /// Run `max_iterations + 1` episodes from random non-terminal starts.
    fn train(&mut self) -> Result<TrainingSummary> {
        self.run()
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }
}
