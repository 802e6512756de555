//! Tabular control algorithms
//!
//! Three learners share the [`QTable`] value store and the
//! [`Learner`](crate::ports::Learner) port:
//!
//! | Learner | Update | Policy |
//! |---------|--------|--------|
//! | [`MonteCarloLearner`] | mean of realised returns | greedy, maintained per visited state |
//! | [`SarsaLearner`] | `r + γ Q(s', a')` with `a'` from the ε-greedy policy | greedy over Q |
//! | [`QLearningLearner`] | `r + γ max_a' Q(s', a')` | greedy over Q |
//!
//! All of them draw randomness from their own seeded [`StdRng`].

pub mod config;
pub mod monte_carlo;
pub mod q_learning;
pub mod q_table;
pub mod sarsa;

use rand::{SeedableRng, rngs::StdRng};

pub use config::{
    Exploration, LearningRate, MonteCarloConfig, QLearningConfig, SafetyCap, SarsaConfig,
    StateSampling, VisitMode,
};
pub use monte_carlo::{MonteCarloLearner, ReturnsBuffer};
pub use q_learning::QLearningLearner;
pub use q_table::QTable;
pub use sarsa::SarsaLearner;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}
