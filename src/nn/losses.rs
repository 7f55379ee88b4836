//! Loss functions for training.
//!
//! Predictions and targets are matrices whose columns are samples.

use crate::{
    error::Result,
    matrix::{DenseMatrix, Matrix},
    tensor::Tensor,
};

/// The loss a model is trained against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loss {
    /// Squared error, `0.5 * sum((p - t)^2)` per sample.
    #[default]
    L2,
    /// Cross-entropy of column-wise softmax probabilities against targets.
    CrossEntropy,
}

impl Loss {
    /// Mean loss per sample.
    pub fn evaluate(&self, predictions: &dyn Matrix, targets: &dyn Matrix) -> Result<f64> {
        predictions.assert_matching(targets)?;
        let samples = predictions.cols().max(1) as f64;
        let mut total = 0.0;
        match self {
            Loss::L2 => {
                for (row, col) in all_entries(predictions) {
                    let diff = predictions.at(row, col)? - targets.at(row, col)?;
                    total += 0.5 * diff * diff;
                }
            }
            Loss::CrossEntropy => {
                let probabilities = softmax_columns(predictions)?;
                for (row, col) in targets.non_zero_entries() {
                    let target = targets.at(row, col)?;
                    if target != 0.0 {
                        total -= target * probabilities.at(row, col)?.max(f64::MIN_POSITIVE).ln();
                    }
                }
            }
        }
        Ok(total / samples)
    }

    /// Derivative of the per-sample loss with respect to the raw predictions.
    ///
    /// For cross-entropy this folds in the softmax, giving `softmax(p) - t`.
    pub fn derivative(&self, predictions: &dyn Matrix, targets: &dyn Matrix) -> Result<DenseMatrix> {
        predictions.assert_matching(targets)?;
        let ret = match self {
            Loss::L2 => {
                let ret = DenseMatrix::new(predictions.rows(), predictions.cols());
                for (row, col) in all_entries(predictions) {
                    ret.put_at(row, col, predictions.at(row, col)?)?;
                }
                ret
            }
            Loss::CrossEntropy => softmax_columns(predictions)?,
        };
        for (row, col) in targets.non_zero_entries() {
            ret.put_at(row, col, ret.at(row, col)? - targets.at(row, col)?)?;
        }
        Ok(ret)
    }
}

fn all_entries(matrix: &dyn Matrix) -> impl Iterator<Item = (usize, usize)> {
    let rows = matrix.rows();
    (0..matrix.cols()).flat_map(move |col| (0..rows).map(move |row| (row, col)))
}

/// Numerically stable softmax of every column.
pub fn softmax_columns(matrix: &dyn Matrix) -> Result<DenseMatrix> {
    let ret = DenseMatrix::new(matrix.rows(), matrix.cols());
    for col in 0..matrix.cols() {
        let values = matrix.get_col(col)?.to_vec()?;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = values.iter().map(|value| (value - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        for (row, exp) in exps.into_iter().enumerate() {
            ret.put_at(row, col, exp / sum)?;
        }
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_l2() {
        let predictions = matrix![[1.0, 2.0], [0.0, 0.0]];
        let targets = matrix![[0.0, 2.0], [1.0, 0.0]];
        assert_relative_eq!(Loss::L2.evaluate(&predictions, &targets).unwrap(), 0.5);
        let derivative = Loss::L2.derivative(&predictions, &targets).unwrap();
        assert_eq!(derivative.to_string(), "[1,0][-1,0]");
    }

    #[test]
    fn test_softmax_columns() {
        let probabilities = softmax_columns(&matrix![[0.0, 1000.0], [0.0, 0.0]]).unwrap();
        assert_relative_eq!(probabilities.at(0, 0).unwrap(), 0.5);
        assert_relative_eq!(probabilities.at(1, 0).unwrap(), 0.5);
        assert_relative_eq!(probabilities.at(0, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_cross_entropy() {
        let predictions = matrix![[0.0], [0.0]];
        let targets = matrix![[1.0], [0.0]];
        assert_relative_eq!(
            Loss::CrossEntropy.evaluate(&predictions, &targets).unwrap(),
            2.0f64.ln()
        );
        let derivative = Loss::CrossEntropy.derivative(&predictions, &targets).unwrap();
        assert_relative_eq!(derivative.at(0, 0).unwrap(), -0.5);
        assert_relative_eq!(derivative.at(1, 0).unwrap(), 0.5);
    }

    #[test]
    fn test_mismatched_targets() {
        let predictions = DenseMatrix::new(2, 3);
        let targets = DenseMatrix::new(3, 2);
        assert!(Loss::L2.evaluate(&predictions, &targets).is_err());
        assert!(Loss::CrossEntropy.derivative(&predictions, &targets).is_err());
    }
}
