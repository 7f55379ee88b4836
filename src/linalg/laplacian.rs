//! Graph normalization over adjacency matrices.

use crate::{error::Result, matrix::Matrix};

/// Rewrites every present entry `(r, c, v)` as `v / sqrt(out[r] * in[c])`.
///
/// `out[r]` sums the values of row `r` and `in[c]` sums column `c`, so
/// weighted and directed graphs are supported. Entries whose denominator is
/// exactly zero are left untouched.
pub fn set_to_laplacian(matrix: &dyn Matrix) -> Result<()> {
    let mut out_degrees = vec![0.0; matrix.rows()];
    let mut in_degrees = vec![0.0; matrix.cols()];
    let mut entries = Vec::new();
    for (row, col) in matrix.non_zero_entries() {
        let value = matrix.at(row, col)?;
        out_degrees[row] += value;
        in_degrees[col] += value;
        entries.push((row, col, value));
    }
    for (row, col, value) in entries {
        let div = (out_degrees[row] * in_degrees[col]).sqrt();
        if div != 0.0 {
            matrix.put_at(row, col, value / div)?;
        }
    }
    Ok(())
}

/// Structural mask: a copy with every present entry set to `1.0`.
pub fn ones_mask(matrix: &dyn Matrix) -> Result<Box<dyn Matrix>> {
    let ret = matrix.zero_copy_shaped();
    for (row, col) in matrix.non_zero_entries() {
        ret.put_at(row, col, 1.0)?;
    }
    Ok(ret)
}
