//! Tabular reinforcement learning for grid navigation
//!
//! This crate provides:
//! - A tabular [`EnvironmentModel`] (transition tensor, reward matrix,
//!   terminal predicate) with seeded transition sampling
//! - Episode simulation shared by the Monte Carlo learner
//! - Monte Carlo (first-visit and every-visit), SARSA and Q-Learning control
//! - A [`PolicyCodec`] rendering learned policies as action labels
//! - Construction of robot navigation problems from text grid maps

pub mod codec;
pub mod environment;
pub mod episode;
pub mod error;
pub mod grid;
pub mod learning;
pub mod policy;
pub mod ports;
pub mod types;

pub use codec::PolicyCodec;
pub use environment::{EnvironmentModel, TransitionTensor};
pub use episode::{Episode, EpisodeGenerator, Step};
pub use error::{Error, Result};
pub use grid::{GridMap, GridProblem};
pub use learning::{
    MonteCarloConfig, MonteCarloLearner, QLearningConfig, QLearningLearner, QTable, SarsaConfig,
    SarsaLearner,
};
pub use policy::Policy;
pub use ports::{Learner, TrainingSummary};
pub use types::{ACTION_LABELS, Action, ActionId, StateId};
