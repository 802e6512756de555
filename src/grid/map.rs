//! Text map parsing.
//!
//! The first line holds the goal coordinates as two numbers. Every following
//! non-blank line is a row of `0` (free) and `1` (obstacle) characters. Rows
//! are listed top to bottom, so the last line of the text is row `y = 0`.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    width: usize,
    height: usize,
    /// Row-major obstacle flags, `y = 0` first.
    obstacles: Vec<bool>,
    goal: (f64, f64),
}

impl GridMap {
    /// Parse a map from its text form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMap`] when there are no grid rows, and
    /// [`Error::InvalidMap`] for a malformed goal line, a character other
    /// than `0`/`1`, or rows of different lengths.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();
        let (_, goal_line) = lines.next().ok_or(Error::EmptyMap)?;
        let goal = parse_goal(goal_line)?;

        let mut rows: Vec<Vec<bool>> = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let row = trimmed
                .chars()
                .map(|c| match c {
                    '0' => Ok(false),
                    '1' => Ok(true),
                    other => Err(Error::InvalidMap {
                        line: line_no,
                        message: format!("unexpected character '{other}'"),
                    }),
                })
                .collect::<Result<Vec<_>>>()?;
            if let Some(first) = rows.first()
                && first.len() != row.len()
            {
                return Err(Error::InvalidMap {
                    line: line_no,
                    message: format!("row has {} cells, expected {}", row.len(), first.len()),
                });
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(Error::EmptyMap);
        }
        rows.reverse();

        let height = rows.len();
        let width = rows[0].len();
        Ok(Self {
            width,
            height,
            obstacles: rows.into_iter().flatten().collect(),
            goal,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Goal coordinates as written in the map.
    pub fn goal(&self) -> (f64, f64) {
        self.goal
    }

    /// True if `(x, y)` is inside the grid.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// True if the cell is an obstacle.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn is_obstacle(&self, x: usize, y: usize) -> bool {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) outside map");
        self.obstacles[y * self.width + x]
    }

    /// True if the cell coordinates equal the goal coordinates exactly.
    pub fn is_goal(&self, x: usize, y: usize) -> bool {
        x as f64 == self.goal.0 && y as f64 == self.goal.1
    }
}

fn parse_goal(line: &str) -> Result<(f64, f64)> {
    let numbers = line
        .split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| Error::InvalidMap {
                line: 1,
                message: format!("goal coordinate '{token}' is not a number"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    match numbers.as_slice() {
        [x, y, ..] => Ok((*x, *y)),
        _ => Err(Error::InvalidMap {
            line: 1,
            message: "expected two goal coordinates".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "2 1\n1111\n1001\n1001\n1111\n";

    #[test]
    fn test_parse_dimensions_and_goal() {
        let map = GridMap::parse(MAP).unwrap();
        assert_eq!((map.width(), map.height()), (4, 4));
        assert_eq!(map.goal(), (2.0, 1.0));
        assert!(map.is_goal(2, 1));
        assert!(!map.is_goal(1, 2));
    }

    #[test]
    fn test_last_line_is_bottom_row() {
        let map = GridMap::parse("0 0\n000\n111\n").unwrap();
        assert!(map.is_obstacle(0, 0));
        assert!(map.is_obstacle(2, 0));
        assert!(!map.is_obstacle(1, 1));
    }

    #[test]
    fn test_contains() {
        let map = GridMap::parse(MAP).unwrap();
        assert!(map.contains(0, 0));
        assert!(map.contains(3, 3));
        assert!(!map.contains(-1, 0));
        assert!(!map.contains(4, 0));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(GridMap::parse(""), Err(Error::EmptyMap));
        assert_eq!(GridMap::parse("1 1\n\n"), Err(Error::EmptyMap));
        assert!(matches!(
            GridMap::parse("a b\n00\n"),
            Err(Error::InvalidMap { line: 1, .. })
        ));
        assert!(matches!(
            GridMap::parse("1\n00\n"),
            Err(Error::InvalidMap { line: 1, .. })
        ));
        assert!(matches!(
            GridMap::parse("1 1\n00\n02\n"),
            Err(Error::InvalidMap { line: 3, .. })
        ));
        assert!(matches!(
            GridMap::parse("1 1\n000\n00\n"),
            Err(Error::InvalidMap { line: 3, .. })
        ));
    }
}
