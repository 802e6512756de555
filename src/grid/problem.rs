//! Reward and transition construction for grid navigation.

use ndarray::{Array2, Array3};
use tracing::debug;

use super::map::GridMap;
use crate::{
    Error, Result,
    environment::{EnvironmentModel, TransitionTensor},
    policy::Policy,
    types::{Action, StateId},
};

/// Reward for standing on (or acting from) an obstacle cell.
pub const OBSTACLE_PENALTY: f64 = -1000.0;

/// Reward of the `wait` action anywhere but the goal.
pub const WAIT_PENALTY: f64 = -100.0;

/// A robot navigation MDP built from a [`GridMap`].
///
/// States enumerate cells column by column: `state = x * height + y`.
/// Moving onto the goal cell ends an episode, because the goal's reward row
/// is all zero.
///
/// Transitions are stored densely as a `(9, S, S)` array of `f64`, so memory
/// grows with the square of the cell count: a 60 x 60 map takes about
/// 930 MB. Keep maps to a few hundred cells unless that budget is available.
#[derive(Debug, Clone)]
pub struct GridProblem {
    map: GridMap,
    slip_probability: f64,
    environment: EnvironmentModel,
}

impl GridProblem {
    /// Build the problem for `map` where every move except `wait` slips to
    /// one of its two neighbouring directions with total probability
    /// `slip_probability`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `slip_probability` is not
    /// in `[0, 1]`.
    pub fn new(map: GridMap, slip_probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&slip_probability) {
            return Err(Error::config(format!(
                "slip probability must be in [0, 1], got {slip_probability}"
            )));
        }
        let rewards = build_rewards(&map);
        let transitions = build_transitions(&map, slip_probability);
        let environment = EnvironmentModel::new(TransitionTensor::Dense(transitions), rewards)?;
        debug!(
            width = map.width(),
            height = map.height(),
            states = environment.state_count(),
            terminal = environment.state_count() - environment.non_terminal_count(),
            "built grid problem"
        );
        Ok(Self {
            map,
            slip_probability,
            environment,
        })
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn slip_probability(&self) -> f64 {
        self.slip_probability
    }

    pub fn environment(&self) -> &EnvironmentModel {
        &self.environment
    }

    pub fn state_count(&self) -> usize {
        self.map.width() * self.map.height()
    }

    /// State index of cell `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] if the cell is outside the map.
    pub fn state_of(&self, x: usize, y: usize) -> Result<StateId> {
        if x < self.map.width() && y < self.map.height() {
            Ok(state_index(&self.map, x, y))
        } else {
            Err(Error::StateOutOfRange {
                state: x * self.map.height() + y,
                state_count: self.state_count(),
            })
        }
    }

    /// Cell `(x, y)` of a state index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] if `state >= state_count()`.
    pub fn cell_of(&self, state: StateId) -> Result<(usize, usize)> {
        self.environment.check_state(state)?;
        Ok(cell(&self.map, state))
    }

    /// One-step lookahead policy: in every state pick the action whose
    /// intended destination has the best cell reward. Ties go to the lowest
    /// action index.
    pub fn greedy_policy(&self) -> Policy {
        let actions = (0..self.state_count())
            .map(|state| {
                let (x, y) = cell(&self.map, state);
                let mut best = Action::Wait;
                let mut best_value = f64::NEG_INFINITY;
                for action in Action::ALL {
                    let (nx, ny) = destination(&self.map, x, y, action);
                    let value = cell_reward(&self.map, nx, ny);
                    if value > best_value {
                        best = action;
                        best_value = value;
                    }
                }
                best.index()
            })
            .collect();
        Policy::from_valid(actions, Action::COUNT)
    }
}

fn state_index(map: &GridMap, x: usize, y: usize) -> StateId {
    x * map.height() + y
}

fn cell(map: &GridMap, state: StateId) -> (usize, usize) {
    (state / map.height(), state % map.height())
}

/// Cell reached by executing `action` from `(x, y)` without slipping.
/// Obstacles trap the robot and moves off the grid leave it in place.
fn destination(map: &GridMap, x: usize, y: usize, action: Action) -> (usize, usize) {
    if map.is_obstacle(x, y) {
        return (x, y);
    }
    let (dx, dy) = action.delta();
    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
    if map.contains(nx, ny) {
        (nx as usize, ny as usize)
    } else {
        (x, y)
    }
}

/// Negative euclidean distance to the goal, or the obstacle penalty.
fn cell_reward(map: &GridMap, x: usize, y: usize) -> f64 {
    if map.is_obstacle(x, y) {
        OBSTACLE_PENALTY
    } else {
        let (gx, gy) = map.goal();
        -((x as f64 - gx).powi(2) + (y as f64 - gy).powi(2)).sqrt()
    }
}

fn build_rewards(map: &GridMap) -> Array2<f64> {
    let states = map.width() * map.height();
    let mut rewards = Array2::zeros((states, Action::COUNT));
    for state in 0..states {
        let (x, y) = cell(map, state);
        let mut row = rewards.row_mut(state);
        row.fill(cell_reward(map, x, y));
        if !map.is_goal(x, y) {
            row[Action::Wait.index()] = WAIT_PENALTY;
        }
    }
    rewards
}

fn build_transitions(map: &GridMap, slip: f64) -> Array3<f64> {
    let states = map.width() * map.height();
    let mut transitions = Array3::zeros((Action::COUNT, states, states));
    for action in Action::ALL {
        let a = action.index();
        for state in 0..states {
            let (x, y) = cell(map, state);
            if map.is_obstacle(x, y) {
                transitions[[a, state, state]] = 1.0;
                continue;
            }
            let (gx, gy) = destination(map, x, y, action);
            let slips = action.slips();
            if slips.is_empty() {
                transitions[[a, state, state_index(map, gx, gy)]] = 1.0;
                continue;
            }
            // Accumulate: a slip may land on the same cell as the intended
            // move when the grid edge blocks it.
            transitions[[a, state, state_index(map, gx, gy)]] += 1.0 - slip;
            for &slipped in slips {
                let (sx, sy) = destination(map, x, y, slipped);
                transitions[[a, state, state_index(map, sx, sy)]] += slip / slips.len() as f64;
            }
        }
    }
    transitions
}
