//! Configuration types for the tabular learners.
//!
//! Every config is validated when a learner is built: discount, learning and
//! exploration rates must lie in `(0, 1]` and iteration counts must be
//! positive.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::config(format!("{name} must be in (0, 1], got {value}")))
    }
}

fn check_positive(name: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(Error::config(format!("{name} must be positive")))
    }
}

/// Which occurrences of a (state, action) pair contribute a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitMode {
    /// Only the earliest occurrence in each episode.
    #[default]
    FirstVisit,
    /// Every occurrence.
    EveryVisit,
}

/// Configuration for a [`MonteCarloLearner`](super::MonteCarloLearner).
///
/// # Examples
///
/// ```
/// use gridnav_rl::learning::{MonteCarloConfig, VisitMode};
///
/// let config = MonteCarloConfig::default()
///     .with_discount_factor(0.95)
///     .with_episodes(200)
///     .with_visit_mode(VisitMode::EveryVisit)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Discount factor γ
    pub discount_factor: f64,
    /// Episodes per training call (the loop runs one extra)
    pub episodes: usize,
    /// Step budget passed to the episode generator; defaults to `episodes`
    pub max_episode_steps: Option<usize>,
    /// Visit rule used by [`Learner::train`](crate::ports::Learner::train)
    pub visit_mode: VisitMode,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl MonteCarloConfig {
    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_episode_steps(mut self, steps: usize) -> Self {
        self.max_episode_steps = Some(steps);
        self
    }

    pub fn with_visit_mode(mut self, mode: VisitMode) -> Self {
        self.visit_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_unit_interval("discount factor", self.discount_factor)?;
        check_positive("episodes", self.episodes)?;
        if let Some(steps) = self.max_episode_steps {
            check_positive("max episode steps", steps)?;
        }
        Ok(())
    }
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.9,
            episodes: 1000,
            max_episode_steps: None,
            visit_mode: VisitMode::FirstVisit,
            seed: None,
        }
    }
}

/// Step interval at which SARSA cuts an episode short.
///
/// The step counter runs across all episodes of a training call, and an
/// episode ends whenever the counter reaches a multiple of the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyCap {
    /// A fixed number of steps.
    Fixed(usize),
    /// A fraction of `max_iterations`, rounded, at least one step.
    FractionOfIterations(f64),
}

impl SafetyCap {
    /// Interval in steps for a run of `max_iterations` episodes.
    pub fn interval(self, max_iterations: usize) -> usize {
        match self {
            SafetyCap::Fixed(steps) => steps.max(1),
            SafetyCap::FractionOfIterations(fraction) => {
                ((fraction * max_iterations as f64).round() as usize).max(1)
            }
        }
    }

    fn validate(self) -> Result<()> {
        match self {
            SafetyCap::Fixed(steps) => check_positive("safety cap", steps),
            SafetyCap::FractionOfIterations(fraction) if fraction > 0.0 && fraction.is_finite() => {
                Ok(())
            }
            SafetyCap::FractionOfIterations(fraction) => Err(Error::config(format!(
                "safety cap fraction must be positive, got {fraction}"
            ))),
        }
    }
}

impl Default for SafetyCap {
    fn default() -> Self {
        SafetyCap::Fixed(200)
    }
}

/// Configuration for a [`SarsaLearner`](super::SarsaLearner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarsaConfig {
    /// Discount factor γ
    pub discount_factor: f64,
    /// Learning rate α
    pub learning_rate: f64,
    /// Exploration rate ε
    pub epsilon: f64,
    /// Training episodes (the loop runs one extra)
    pub max_iterations: usize,
    pub safety_cap: SafetyCap,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl SarsaConfig {
    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_safety_cap(mut self, cap: SafetyCap) -> Self {
        self.safety_cap = cap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_unit_interval("discount factor", self.discount_factor)?;
        check_unit_interval("learning rate", self.learning_rate)?;
        check_unit_interval("epsilon", self.epsilon)?;
        check_positive("max iterations", self.max_iterations)?;
        self.safety_cap.validate()
    }
}

impl Default for SarsaConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.9,
            learning_rate: 0.5,
            epsilon: 0.1,
            max_iterations: 1000,
            safety_cap: SafetyCap::default(),
            seed: None,
        }
    }
}

/// Step size schedule for Q-Learning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningRate {
    Constant(f64),
    /// `1 / (1 + visits(s, a))`, counting earlier visits only.
    VisitDecay,
    /// `1 / sqrt(n + 2)` at iteration `n` (1-based).
    SqrtIterationDecay,
}

impl LearningRate {
    pub(crate) fn rate(self, iteration: usize, prior_visits: u64) -> f64 {
        match self {
            LearningRate::Constant(alpha) => alpha,
            LearningRate::VisitDecay => 1.0 / (1.0 + prior_visits as f64),
            LearningRate::SqrtIterationDecay => 1.0 / ((iteration + 2) as f64).sqrt(),
        }
    }
}

/// Behaviour policy used to pick actions while Q-Learning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exploration {
    /// Uniformly random actions.
    Uniform,
    /// Random with probability ε, greedy otherwise.
    EpsilonGreedy(f64),
    /// Greedy with probability `1 - 1 / ln(n + 2)` at iteration `n` (1-based).
    LogDecay,
}

impl Exploration {
    /// Probability of taking a random action at iteration `n`.
    pub(crate) fn random_probability(self, iteration: usize) -> f64 {
        match self {
            Exploration::Uniform => 1.0,
            Exploration::EpsilonGreedy(epsilon) => epsilon,
            Exploration::LogDecay => (1.0 / ((iteration + 2) as f64).ln()).min(1.0),
        }
    }
}

/// How Q-Learning picks the state to update at each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateSampling {
    /// A fresh uniform non-terminal state every iteration.
    Uniform,
    /// Follow sampled transitions, restarting from a uniform non-terminal
    /// state after `reset_interval` steps without reaching a terminal state,
    /// or as soon as one is reached.
    Trajectory { reset_interval: usize },
}

/// Configuration for a [`QLearningLearner`](super::QLearningLearner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Discount factor γ
    pub discount_factor: f64,
    /// Number of single-transition updates
    pub max_iterations: usize,
    pub learning_rate: LearningRate,
    pub exploration: Exploration,
    pub state_sampling: StateSampling,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl QLearningConfig {
    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_learning_rate(mut self, schedule: LearningRate) -> Self {
        self.learning_rate = schedule;
        self
    }

    pub fn with_exploration(mut self, exploration: Exploration) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_state_sampling(mut self, sampling: StateSampling) -> Self {
        self.state_sampling = sampling;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_unit_interval("discount factor", self.discount_factor)?;
        check_positive("max iterations", self.max_iterations)?;
        if let LearningRate::Constant(alpha) = self.learning_rate {
            check_unit_interval("learning rate", alpha)?;
        }
        if let Exploration::EpsilonGreedy(epsilon) = self.exploration {
            check_unit_interval("epsilon", epsilon)?;
        }
        if let StateSampling::Trajectory { reset_interval } = self.state_sampling {
            check_positive("reset interval", reset_interval)?;
        }
        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.9,
            max_iterations: 10_000,
            learning_rate: LearningRate::VisitDecay,
            exploration: Exploration::LogDecay,
            state_sampling: StateSampling::Trajectory {
                reset_interval: 100,
            },
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs_are_valid() {
        assert!(MonteCarloConfig::default().validate().is_ok());
        assert!(SarsaConfig::default().validate().is_ok());
        assert!(QLearningConfig::default().validate().is_ok());
    }

    #[test]
    fn rates_outside_unit_interval_are_rejected() {
        for gamma in [0.0, -0.1, 1.5, f64::NAN] {
            let err = SarsaConfig::default()
                .with_discount_factor(gamma)
                .validate()
                .unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration { .. }));
        }
        assert!(SarsaConfig::default().with_epsilon(0.0).validate().is_err());
        assert!(SarsaConfig::default().with_learning_rate(1.01).validate().is_err());
        assert!(SarsaConfig::default().with_discount_factor(1.0).validate().is_ok());
        assert!(
            QLearningConfig::default()
                .with_learning_rate(LearningRate::Constant(0.0))
                .validate()
                .is_err()
        );
        assert!(
            QLearningConfig::default()
                .with_exploration(Exploration::EpsilonGreedy(2.0))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn safety_cap_intervals() {
        assert_eq!(SafetyCap::Fixed(200).interval(1000), 200);
        assert_eq!(SafetyCap::FractionOfIterations(0.1).interval(1000), 100);
        assert_eq!(SafetyCap::FractionOfIterations(0.1).interval(3), 1);
        assert!(SarsaConfig::default()
            .with_safety_cap(SafetyCap::Fixed(0))
            .validate()
            .is_err());
    }

    #[test]
    fn learning_rate_schedules() {
        assert_eq!(LearningRate::Constant(0.3).rate(50, 7), 0.3);
        assert_eq!(LearningRate::VisitDecay.rate(50, 0), 1.0);
        assert_eq!(LearningRate::VisitDecay.rate(50, 3), 0.25);
        assert_eq!(LearningRate::SqrtIterationDecay.rate(2, 0), 0.5);
    }

    #[test]
    fn log_decay_exploration_shrinks() {
        let early = Exploration::LogDecay.random_probability(1);
        let late = Exploration::LogDecay.random_probability(10_000);
        assert!(early > late);
        assert!(early <= 1.0);
        assert_eq!(Exploration::Uniform.random_probability(10), 1.0);
    }
}
