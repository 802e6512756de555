//! Tabular environment model consumed by the learners
//!
//! An [`EnvironmentModel`] owns the transition tensor `P[a][s][s']` and the
//! reward matrix `R[s][a]`. It answers the three questions every learner
//! asks while simulating: is a state terminal, what does an action pay, and
//! where does it lead.

pub mod model;
pub mod transitions;

pub use model::{EnvironmentModel, PROBABILITY_TOLERANCE, START_STATE_ATTEMPTS_PER_STATE};
pub use transitions::TransitionTensor;
