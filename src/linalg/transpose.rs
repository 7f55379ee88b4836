//! Matrix transpose operations.

use crate::{error::Result, matrix::Matrix};

/// Transposed copy of a matrix, of the same kind.
pub fn transposed(matrix: &dyn Matrix) -> Result<Box<dyn Matrix>> {
    let ret = matrix.zero_copy_matrix(matrix.cols(), matrix.rows());
    for (row, col) in matrix.non_zero_entries() {
        ret.put_at(col, row, matrix.at(row, col)?)?;
    }
    Ok(ret)
}
