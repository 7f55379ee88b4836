use super::check_position;
use crate::{
    error::Result,
    matrix::{check_matrix_size, Entries, Matrix},
    tensor::{Shape, Tensor},
};
use std::fmt;

/// Transposed view of a matrix.
///
/// Element `(row, col)` of the view is element `(col, row)` of the backing
/// matrix. Zero copies produce matrices of the backing matrix's kind.
#[derive(Debug, Clone, Copy)]
pub struct TransposedMatrix<'a> {
    matrix: &'a dyn Matrix,
}

impl<'a> TransposedMatrix<'a> {
    pub fn new(matrix: &'a dyn Matrix) -> Self {
        Self { matrix }
    }

    /// The backing matrix.
    pub fn inner(&self) -> &'a dyn Matrix {
        self.matrix
    }

    fn coordinates(&self, pos: usize) -> Result<(usize, usize)> {
        check_position(pos, self.size())?;
        let rows = self.matrix.cols();
        Ok((pos % rows, pos / rows))
    }
}

impl Tensor for TransposedMatrix<'_> {
    fn size(&self) -> usize {
        self.matrix.size()
    }

    fn get(&self, pos: usize) -> Result<f64> {
        let (row, col) = self.coordinates(pos)?;
        self.matrix.at(col, row)
    }

    fn put(&self, pos: usize, value: f64) -> Result<()> {
        let (row, col) = self.coordinates(pos)?;
        self.matrix.put_at(col, row, value)
    }

    fn zero_copy_sized(&self, size: usize) -> Result<Box<dyn Tensor>> {
        check_matrix_size(self.rows(), self.cols(), size)?;
        Ok(self.matrix.zero_copy_matrix(self.rows(), self.cols()))
    }

    fn kind(&self) -> &'static str {
        "TransposedMatrix"
    }

    fn shape(&self) -> Shape {
        Shape::Matrix {
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    fn non_zero_elements(&self) -> Vec<usize> {
        let rows = self.rows();
        self.non_zero_entries()
            .map(|(row, col)| row + col * rows)
            .collect()
    }
}

impl Matrix for TransposedMatrix<'_> {
    fn rows(&self) -> usize {
        self.matrix.cols()
    }

    fn cols(&self) -> usize {
        self.matrix.rows()
    }

    fn non_zero_entries(&self) -> Entries<'_> {
        Box::new(self.matrix.non_zero_entries().map(|(row, col)| (col, row)))
    }

    fn zero_copy_matrix(&self, rows: usize, cols: usize) -> Box<dyn Matrix> {
        self.matrix.zero_copy_matrix(rows, cols)
    }

    fn as_matrix(&self) -> &dyn Matrix {
        self
    }
}

impl fmt::Display for TransposedMatrix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_matrix(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DenseMatrix, SparseMatrix};

    #[test]
    fn test_transposed_view_reads() {
        let a = matrix![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let t = a.as_transposed();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.at(2, 1).unwrap(), 6.0);
        assert_eq!(t.at(0, 1).unwrap(), 4.0);
        assert_eq!(t.describe(), "TransposedMatrix (3,2)");
        assert!(t.at(0, 2).is_err());
    }

    #[test]
    fn test_transposed_view_writes_through() {
        let a = DenseMatrix::new(2, 3);
        let t = a.as_transposed();
        t.put_at(2, 0, 9.0).unwrap();
        assert_eq!(a.at(0, 2).unwrap(), 9.0);
        a.put_at(1, 1, -1.0).unwrap();
        assert_eq!(t.at(1, 1).unwrap(), -1.0);
    }

    #[test]
    fn test_transposed_view_sparse_entries() {
        let a = SparseMatrix::from_triplets(2, 3, [(1, 2, 5.0)]).unwrap();
        let t = a.as_transposed();
        let entries: Vec<_> = t.non_zero_entries().collect();
        assert_eq!(entries, vec![(2, 1)]);
        assert_eq!(t.non_zero_elements(), vec![2 + 1 * 3]);
        assert_eq!(t.zero_copy_shaped().describe(), "SparseMatrix (3,2)");
    }

    #[test]
    fn test_transposed_view_multiplies_like_copy() {
        let a = matrix![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let b = matrix![[1.0, 1.0, 0.0], [0.0, 1.0, 2.0]];
        let via_view = a.as_transposed().matmul(&b.as_transposed()).unwrap();
        let via_copy = a.transposed().unwrap().matmul(&*b.transposed().unwrap()).unwrap();
        assert_eq!(via_view.to_string(), via_copy.to_string());
    }
}
