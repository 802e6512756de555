//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use gridnav_rl::{EnvironmentModel, GridMap, GridProblem};

/// Open 3x3 area inside a wall border, goal in the middle of the top row.
pub const SMALL_MAP: &str = "\
2 3
11111
10001
10001
10001
11111
";

/// State 0 pays `good` for action 0 and `bad` for action 1; both actions
/// move to the absorbing terminal state 1.
pub fn two_state_mdp(good: f64, bad: f64) -> EnvironmentModel {
    let to_goal = vec![vec![0.0, 1.0], vec![0.0, 1.0]];
    EnvironmentModel::from_nested(
        vec![to_goal.clone(), to_goal],
        vec![vec![good, bad], vec![0.0, 0.0]],
    )
    .unwrap()
}

/// States 0 and 1 bounce into each other under every action; the terminal
/// state 2 is unreachable, so episodes only end at the step cap.
pub fn bouncing_mdp() -> EnvironmentModel {
    let bounce = vec![
        vec![0.0, 1.0, 0.0],
        vec![1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ];
    EnvironmentModel::from_nested(
        vec![bounce.clone(), bounce],
        vec![vec![-1.0, -1.0], vec![-1.0, -2.0], vec![0.0, 0.0]],
    )
    .unwrap()
}

/// Deterministic chain 0 -> 1 -> 2 (terminal) under every action.
pub fn chain_mdp() -> EnvironmentModel {
    let forward = vec![
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
        vec![0.0, 0.0, 1.0],
    ];
    EnvironmentModel::from_nested(
        vec![forward.clone(), forward],
        vec![vec![-1.0, -3.0], vec![-2.0, -4.0], vec![0.0, 0.0]],
    )
    .unwrap()
}

pub fn small_problem(slip: f64) -> GridProblem {
    GridProblem::new(GridMap::parse(SMALL_MAP).unwrap(), slip).unwrap()
}
