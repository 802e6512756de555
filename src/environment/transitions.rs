//! Transition tensor storage and dimension inference.

use ndarray::{Array2, Array3, ArrayView1, s};

use crate::{Error, Result};

/// Transition probabilities indexed as `[action][state][next_state]`.
///
/// Two layouts are accepted: a single rank-3 array, or one square matrix per
/// action. Both report the same dimensions for equivalent data.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionTensor {
    /// Rank-3 array of shape `(actions, states, states)`.
    Dense(Array3<f64>),
    /// One `(states, states)` matrix per action.
    PerAction(Vec<Array2<f64>>),
}

impl TransitionTensor {
    /// Build a per-action tensor from nested vectors `[action][state][next_state]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if any row has a different length
    /// than the number of rows in its matrix.
    pub fn from_nested(matrices: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let mut per_action = Vec::with_capacity(matrices.len());
        for (action, rows) in matrices.into_iter().enumerate() {
            let n = rows.len();
            let mut flat = Vec::with_capacity(n * n);
            for row in rows {
                if row.len() != n {
                    return Err(Error::DimensionMismatch {
                        what: format!("transition row for action {action}"),
                        expected: n,
                        got: row.len(),
                    });
                }
                flat.extend(row);
            }
            let len = flat.len();
            let matrix =
                Array2::from_shape_vec((n, n), flat).map_err(|_| Error::DimensionMismatch {
                    what: format!("transition matrix for action {action}"),
                    expected: n * n,
                    got: len,
                })?;
            per_action.push(matrix);
        }
        Ok(TransitionTensor::PerAction(per_action))
    }

    /// Returns `(state_count, action_count)`.
    ///
    /// The action count is the outer length in both layouts. The state count
    /// is the middle dimension of a rank-3 array, or the row count of the
    /// first matrix in the per-action layout.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            TransitionTensor::Dense(tensor) => {
                let (actions, states, _) = tensor.dim();
                (states, actions)
            }
            TransitionTensor::PerAction(matrices) => {
                let states = matrices.first().map(|m| m.nrows()).unwrap_or(0);
                (states, matrices.len())
            }
        }
    }

    /// Check every matrix is `states x states`.
    pub(crate) fn check_square(&self) -> Result<()> {
        let (states, _) = self.dimensions();
        match self {
            TransitionTensor::Dense(tensor) => {
                let (_, rows, cols) = tensor.dim();
                if rows != cols {
                    return Err(Error::DimensionMismatch {
                        what: "next-state axis of transition tensor".to_string(),
                        expected: rows,
                        got: cols,
                    });
                }
            }
            TransitionTensor::PerAction(matrices) => {
                for (action, matrix) in matrices.iter().enumerate() {
                    let (rows, cols) = matrix.dim();
                    if rows != states || cols != states {
                        return Err(Error::DimensionMismatch {
                            what: format!("transition matrix for action {action}"),
                            expected: states,
                            got: if rows != states { rows } else { cols },
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Distribution over next states for `(action, state)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn row(&self, action: usize, state: usize) -> ArrayView1<'_, f64> {
        match self {
            TransitionTensor::Dense(tensor) => tensor.slice(s![action, state, ..]),
            TransitionTensor::PerAction(matrices) => matrices[action].row(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array3, array};

    use super::*;

    fn identity_pair() -> Vec<Array2<f64>> {
        vec![array![[1.0, 0.0], [0.0, 1.0]], array![[0.0, 1.0], [0.0, 1.0]]]
    }

    #[test]
    fn test_dense_and_per_action_dimensions_agree() {
        let per_action = identity_pair();
        let mut dense = Array3::<f64>::zeros((2, 2, 2));
        for (a, m) in per_action.iter().enumerate() {
            dense.slice_mut(s![a, .., ..]).assign(m);
        }

        let dense = TransitionTensor::Dense(dense);
        let per_action = TransitionTensor::PerAction(per_action);

        assert_eq!(dense.dimensions(), (2, 2));
        assert_eq!(dense.dimensions(), per_action.dimensions());
        assert_eq!(dense.row(1, 0), per_action.row(1, 0));
    }

    #[test]
    fn test_non_square_dense_rejected() {
        let ragged = Array3::<f64>::zeros((9, 4, 5));
        let tensor = TransitionTensor::Dense(ragged);
        assert_eq!(tensor.dimensions(), (4, 9));
        assert!(matches!(
            tensor.check_square(),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_nested_rejects_ragged_rows() {
        let nested = vec![vec![vec![1.0, 0.0], vec![1.0]]];
        assert!(matches!(
            TransitionTensor::from_nested(nested),
            Err(Error::DimensionMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_empty_tensor_has_no_states() {
        assert_eq!(TransitionTensor::PerAction(vec![]).dimensions(), (0, 0));
    }
}
