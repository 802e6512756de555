//! Port definitions (trait interfaces)

pub mod learner;

pub use learner::{Learner, TrainingSummary};
