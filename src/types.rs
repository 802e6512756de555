//! Navigation actions and the label set used to render policies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Dense state index in `[0, state_count)`.
pub type StateId = usize;

/// Dense action index in `[0, action_count)`.
pub type ActionId = usize;

/// Labels of the nine navigation actions, in action-index order.
pub const ACTION_LABELS: [&str; 9] = ["wait", "N", "NE", "E", "SE", "S", "SO", "O", "NO"];

/// One of the nine moves available to the robot on the grid.
///
/// The discriminant is the action index used throughout the value tables,
/// so `Action::North as usize == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Wait = 0,
    North = 1,
    NorthEast = 2,
    East = 3,
    SouthEast = 4,
    South = 5,
    SouthWest = 6,
    West = 7,
    NorthWest = 8,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; 9] = [
        Action::Wait,
        Action::North,
        Action::NorthEast,
        Action::East,
        Action::SouthEast,
        Action::South,
        Action::SouthWest,
        Action::West,
        Action::NorthWest,
    ];

    /// Number of navigation actions.
    pub const COUNT: usize = 9;

    /// Look up an action by index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownActionIndex`] if `index >= 9`.
    pub fn from_index(index: ActionId) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::UnknownActionIndex {
                index,
                label_count: Self::COUNT,
            })
    }

    /// Index of this action in the value tables.
    pub fn index(self) -> ActionId {
        self as usize
    }

    /// Short label (`"wait"`, `"N"`, `"NE"`, ...).
    pub fn label(self) -> &'static str {
        ACTION_LABELS[self.index()]
    }

    /// Grid displacement `(dx, dy)`; north increases `y`.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Action::Wait => (0, 0),
            Action::North => (0, 1),
            Action::NorthEast => (1, 1),
            Action::East => (1, 0),
            Action::SouthEast => (1, -1),
            Action::South => (0, -1),
            Action::SouthWest => (-1, -1),
            Action::West => (-1, 0),
            Action::NorthWest => (-1, 1),
        }
    }

    /// Moves the robot may execute instead of this one when it slips.
    ///
    /// Straight moves slip to the two adjacent diagonals, diagonal moves slip
    /// to their two straight components. Waiting never slips.
    pub fn slips(self) -> &'static [Action] {
        match self {
            Action::Wait => &[],
            Action::North => &[Action::NorthEast, Action::NorthWest],
            Action::South => &[Action::SouthEast, Action::SouthWest],
            Action::East => &[Action::NorthEast, Action::SouthEast],
            Action::West => &[Action::NorthWest, Action::SouthWest],
            Action::NorthEast => &[Action::North, Action::East],
            Action::NorthWest => &[Action::North, Action::West],
            Action::SouthEast => &[Action::South, Action::East],
            Action::SouthWest => &[Action::South, Action::West],
        }
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action.index()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
