//! Matrix multiplication operations.

use super::incompatible;
use crate::{
    error::Result,
    matrix::{DenseMatrix, Matrix},
    tensor::{DenseTensor, Tensor},
};

/// Matrix product `lhs * rhs`.
///
/// The result has the kind of `rhs`. Cost is `O(nnz(lhs) * rhs.cols())`.
pub fn matmul(lhs: &dyn Matrix, rhs: &dyn Matrix) -> Result<Box<dyn Matrix>> {
    if lhs.cols() != rhs.rows() {
        return Err(incompatible(lhs, rhs));
    }
    let ret = rhs.zero_copy_matrix(lhs.rows(), rhs.cols());
    for (row, col) in lhs.non_zero_entries() {
        let value = lhs.at(row, col)?;
        for col2 in 0..rhs.cols() {
            ret.put_at(row, col2, ret.at(row, col2)? + value * rhs.at(col, col2)?)?;
        }
    }
    Ok(ret)
}

/// Matrix product with either operand implicitly transposed.
///
/// Equivalent to transposing the flagged operands first, but entries of `lhs`
/// are read in their stored layout and `rhs` is accessed through swapped
/// coordinates, so no transpose is ever allocated.
pub fn matmul_transposed(
    lhs: &dyn Matrix,
    rhs: &dyn Matrix,
    transpose_lhs: bool,
    transpose_rhs: bool,
) -> Result<Box<dyn Matrix>> {
    let lhs_inner = if transpose_lhs { lhs.rows() } else { lhs.cols() };
    let rhs_inner = if transpose_rhs { rhs.cols() } else { rhs.rows() };
    if lhs_inner != rhs_inner {
        return Err(incompatible(lhs, rhs));
    }
    let out_rows = if transpose_lhs { lhs.cols() } else { lhs.rows() };
    let out_cols = if transpose_rhs { rhs.rows() } else { rhs.cols() };
    let ret = rhs.zero_copy_matrix(out_rows, out_cols);
    for (stored_row, stored_col) in lhs.non_zero_entries() {
        let value = lhs.at(stored_row, stored_col)?;
        let (row, inner) = if transpose_lhs {
            (stored_col, stored_row)
        } else {
            (stored_row, stored_col)
        };
        for col2 in 0..out_cols {
            let other = if transpose_rhs {
                rhs.at(col2, inner)?
            } else {
                rhs.at(inner, col2)?
            };
            ret.put_at(row, col2, ret.at(row, col2)? + value * other)?;
        }
    }
    Ok(ret)
}

/// Computes `matrix * x`.
pub fn transform(matrix: &dyn Matrix, x: &dyn Tensor) -> Result<DenseTensor> {
    x.assert_size(matrix.cols())?;
    let ret = DenseTensor::new(matrix.rows());
    for (row, col) in matrix.non_zero_entries() {
        ret.put(row, ret.get(row)? + matrix.at(row, col)? * x.get(col)?)?;
    }
    Ok(ret)
}

/// Outer product of two vectors.
pub fn external(horizontal: &dyn Tensor, vertical: &dyn Tensor) -> Result<DenseMatrix> {
    let ret = DenseMatrix::new(horizontal.size(), vertical.size());
    for row in 0..horizontal.size() {
        let left = horizontal.get(row)?;
        for col in 0..vertical.size() {
            ret.put_at(row, col, left * vertical.get(col)?)?;
        }
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::GraphmatError, matrix::SparseMatrix};
    use approx::assert_relative_eq;

    #[test]
    fn test_matmul() {
        let a = matrix![[1.0, 2.0], [3.0, 4.0]];
        let b = matrix![[5.0, 6.0], [7.0, 8.0]];
        let c = matmul(&a, &b).unwrap();

        assert_eq!((c.rows(), c.cols()), (2, 2));
        assert_relative_eq!(c.at(0, 0).unwrap(), 19.0);
        assert_relative_eq!(c.at(0, 1).unwrap(), 22.0);
        assert_relative_eq!(c.at(1, 0).unwrap(), 43.0);
        assert_relative_eq!(c.at(1, 1).unwrap(), 50.0);
    }

    #[test]
    fn test_matmul_mismatch() {
        let a = DenseMatrix::new(2, 3);
        let b = DenseMatrix::new(2, 3);
        match matmul(&a, &b) {
            Err(GraphmatError::IncompatibleShapes(lhs, rhs)) => {
                assert_eq!(lhs, vec![2, 3]);
                assert_eq!(rhs, vec![2, 3]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_matmul_sparse_left_operand() {
        let a = SparseMatrix::from_triplets(2, 3, [(0, 2, 2.0), (1, 0, -1.0)]).unwrap();
        let b = matrix![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c.describe(), "DenseMatrix (2,2)");
        assert_eq!(c.to_string(), "[10,12][-1,-2]");
    }

    #[test]
    fn test_matmul_transposed_shapes() {
        let a = matrix![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let b = matrix![[1.0, 0.0, 2.0], [0.0, 1.0, 1.0]];

        // a^T * b: (3x2)(2x3)
        let c = matmul_transposed(&a, &b, true, false).unwrap();
        assert_eq!((c.rows(), c.cols()), (3, 3));
        assert_eq!(c.to_string(), "[1,4,6][2,5,9][3,6,12]");

        // a * b^T: (2x3)(3x2)
        let d = matmul_transposed(&a, &b, false, true).unwrap();
        assert_eq!(d.to_string(), "[7,5][16,11]");

        assert!(matmul_transposed(&a, &b, false, false).is_err());
        assert!(matmul_transposed(&a, &b, true, true).is_err());
    }

    #[test]
    fn test_transform() {
        let a = matrix![[1.0, 2.0], [3.0, 4.0], [0.0, 1.0]];
        let x = DenseTensor::from_vec(vec![1.0, -1.0]);
        let y = transform(&a, &x).unwrap();
        assert_eq!(y.to_vec().unwrap(), vec![-1.0, -1.0, -1.0]);
        assert!(transform(&a, &DenseTensor::new(3)).is_err());
    }
}
