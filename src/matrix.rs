//! Two-dimensional matrices over a column-major linear index.
//!
//! A [`Matrix`] is a [`Tensor`] whose element `(row, col)` lives at linear
//! position `row + col * rows`. Algorithms enumerate entries only through
//! [`Matrix::non_zero_entries`], so sparse backends pay only for what they
//! store.

mod dense;
mod sparse;

pub use dense::DenseMatrix;
pub use sparse::SparseMatrix;

use crate::{
    error::{GraphmatError, Result},
    linalg,
    tensor::{DenseTensor, Tensor},
    view::{AccessCol, AccessRow, TransposedMatrix},
};
use std::fmt;

/// Iterator over `(row, col)` coordinates of structurally non-zero entries.
pub type Entries<'a> = Box<dyn Iterator<Item = (usize, usize)> + 'a>;

/// A tensor with row and column structure.
pub trait Matrix: Tensor {
    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    /// Coordinates of the entries the backend considers present.
    fn non_zero_entries(&self) -> Entries<'_>;

    /// Creates an all-zero matrix of the same kind with the given dimensions.
    fn zero_copy_matrix(&self, rows: usize, cols: usize) -> Box<dyn Matrix>;

    /// Returns `self` as a trait object.
    fn as_matrix(&self) -> &dyn Matrix;

    fn check_element(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(GraphmatError::ElementOutOfRange {
                row,
                col,
                matrix: self.describe(),
            });
        }
        Ok(())
    }

    /// Reads element `(row, col)`.
    fn at(&self, row: usize, col: usize) -> Result<f64> {
        self.check_element(row, col)?;
        self.get(row + col * self.rows())
    }

    /// Writes element `(row, col)`.
    fn put_at(&self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_element(row, col)?;
        self.put(row + col * self.rows(), value)
    }

    /// All-zero matrix of the same kind and dimensions.
    fn zero_copy_shaped(&self) -> Box<dyn Matrix> {
        self.zero_copy_matrix(self.rows(), self.cols())
    }

    fn copy_matrix(&self) -> Result<Box<dyn Matrix>> {
        let ret = self.zero_copy_shaped();
        for (row, col) in self.non_zero_entries() {
            ret.put_at(row, col, self.at(row, col)?)?;
        }
        Ok(ret)
    }

    /// Transposed copy. No in-place transposition is offered.
    fn transposed(&self) -> Result<Box<dyn Matrix>> {
        linalg::transposed(self.as_matrix())
    }

    /// Transposed view sharing this matrix's elements.
    fn as_transposed(&self) -> TransposedMatrix<'_> {
        TransposedMatrix::new(self.as_matrix())
    }

    /// Computes `self * x` for a vector of `cols` elements.
    fn transform(&self, x: &dyn Tensor) -> Result<DenseTensor> {
        linalg::transform(self.as_matrix(), x)
    }

    fn matmul(&self, with: &dyn Matrix) -> Result<Box<dyn Matrix>> {
        linalg::matmul(self.as_matrix(), with)
    }

    /// Multiplies with either operand implicitly transposed.
    fn matmul_transposed(
        &self,
        with: &dyn Matrix,
        transpose_self: bool,
        transpose_with: bool,
    ) -> Result<Box<dyn Matrix>> {
        linalg::matmul_transposed(self.as_matrix(), with, transpose_self, transpose_with)
    }

    /// Copy with every present entry replaced by `1.0`.
    fn ones_mask(&self) -> Result<Box<dyn Matrix>> {
        linalg::ones_mask(self.as_matrix())
    }

    /// Copy holding the symmetric-normalized Laplacian.
    fn laplacian(&self) -> Result<Box<dyn Matrix>> {
        let ret = self.copy_matrix()?;
        ret.set_to_laplacian()?;
        Ok(ret)
    }

    /// Normalizes the entries in place, see [`linalg::set_to_laplacian`].
    fn set_to_laplacian(&self) -> Result<()> {
        linalg::set_to_laplacian(self.as_matrix())
    }

    /// Row `row` as a view; edits go to this matrix.
    fn get_row(&self, row: usize) -> Result<AccessRow<'_>> {
        AccessRow::new(self.as_matrix(), row)
    }

    /// Column `col` as a view; edits go to this matrix.
    fn get_col(&self, col: usize) -> Result<AccessCol<'_>> {
        AccessCol::new(self.as_matrix(), col)
    }

    fn access_rows(&self) -> Vec<AccessRow<'_>> {
        (0..self.rows())
            .map(|row| AccessRow::unchecked(self.as_matrix(), row))
            .collect()
    }

    fn access_columns(&self) -> Vec<AccessCol<'_>> {
        (0..self.cols())
            .map(|col| AccessCol::unchecked(self.as_matrix(), col))
            .collect()
    }

    /// Views of the given rows, in the given order.
    fn access_rows_at(&self, rows: &[usize]) -> Result<Vec<AccessRow<'_>>> {
        rows.iter().map(|&row| self.get_row(row)).collect()
    }

    /// Views of the given columns, in the given order.
    fn access_columns_at(&self, cols: &[usize]) -> Result<Vec<AccessCol<'_>>> {
        cols.iter().map(|&col| self.get_col(col)).collect()
    }
}

/// Fails unless `size` is the element count of a `rows x cols` matrix.
pub(crate) fn check_matrix_size(rows: usize, cols: usize, size: usize) -> Result<()> {
    if size != rows * cols {
        return Err(GraphmatError::InvalidShape(format!(
            "desired matrix size {} can only be equal to rows {} * cols {}",
            size, rows, cols
        )));
    }
    Ok(())
}

/// Outer product: entry `(i, j)` is `horizontal[i] * vertical[j]`.
pub fn external(horizontal: &dyn Tensor, vertical: &dyn Tensor) -> Result<DenseMatrix> {
    linalg::external(horizontal, vertical)
}

impl fmt::Display for dyn Matrix + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            write!(f, "[")?;
            for col in 0..self.cols() {
                if col != 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", self.at(row, col).map_err(|_| fmt::Error)?)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
