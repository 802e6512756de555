//! Grid navigation problems
//!
//! A [`GridMap`] is parsed from the text map format; a [`GridProblem`] turns
//! it into the reward matrix, transition tensor and baseline policy of the
//! robot navigation task.

pub mod map;
pub mod problem;

pub use map::GridMap;
pub use problem::{GridProblem, OBSTACLE_PENALTY, WAIT_PENALTY};
