use super::check_position;
use crate::{
    error::{GraphmatError, Result},
    matrix::{check_matrix_size, DenseMatrix, Entries, Matrix},
    tensor::{Shape, Tensor},
};
use std::fmt;

/// A matrix whose columns are borrowed tensors.
///
/// Nothing is copied: column `c` of the matrix is `columns[c]`, which may
/// itself be a view into another matrix. Zero copies are dense.
#[derive(Debug)]
pub struct WrapCols<T = Box<dyn Tensor>> {
    rows: usize,
    columns: Vec<T>,
}

impl<T: Tensor> WrapCols<T> {
    /// # Errors
    ///
    /// Returns an error if the columns differ in size.
    pub fn new(columns: Vec<T>) -> Result<Self> {
        let rows = columns.first().map_or(0, Tensor::size);
        if let Some(column) = columns.iter().find(|column| column.size() != rows) {
            return Err(GraphmatError::shape_mismatch(vec![rows], vec![column.size()]));
        }
        Ok(Self { rows, columns })
    }

    pub fn columns(&self) -> &[T] {
        &self.columns
    }

    fn coordinates(&self, pos: usize) -> Result<(usize, usize)> {
        check_position(pos, self.size())?;
        Ok((pos % self.rows, pos / self.rows))
    }
}

impl<T: Tensor> Tensor for WrapCols<T> {
    fn size(&self) -> usize {
        self.rows * self.columns.len()
    }

    fn get(&self, pos: usize) -> Result<f64> {
        let (row, col) = self.coordinates(pos)?;
        self.columns[col].get(row)
    }

    fn put(&self, pos: usize, value: f64) -> Result<()> {
        let (row, col) = self.coordinates(pos)?;
        self.columns[col].put(row, value)
    }

    fn zero_copy_sized(&self, size: usize) -> Result<Box<dyn Tensor>> {
        check_matrix_size(self.rows, self.columns.len(), size)?;
        Ok(Box::new(DenseMatrix::new(self.rows, self.columns.len())))
    }

    fn kind(&self) -> &'static str {
        "WrapCols"
    }

    fn shape(&self) -> Shape {
        Shape::Matrix {
            rows: self.rows,
            cols: self.columns.len(),
        }
    }

    fn non_zero_elements(&self) -> Vec<usize> {
        let rows = self.rows;
        self.non_zero_entries()
            .map(|(row, col)| row + col * rows)
            .collect()
    }
}

impl<T: Tensor> Matrix for WrapCols<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.columns.len()
    }

    fn non_zero_entries(&self) -> Entries<'_> {
        Box::new(self.columns.iter().enumerate().flat_map(|(col, column)| {
            column
                .non_zero_elements()
                .into_iter()
                .map(move |row| (row, col))
        }))
    }

    fn zero_copy_matrix(&self, rows: usize, cols: usize) -> Box<dyn Matrix> {
        Box::new(DenseMatrix::new(rows, cols))
    }

    fn as_matrix(&self) -> &dyn Matrix {
        self
    }
}

impl<T: Tensor> fmt::Display for WrapCols<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_matrix(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{matrix::SparseMatrix, tensor::DenseTensor};

    #[test]
    fn test_wrap_selected_columns() {
        let features = matrix![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];
        let batch = WrapCols::new(features.access_columns_at(&[3, 1]).unwrap()).unwrap();
        assert_eq!((batch.rows(), batch.cols()), (2, 2));
        assert_eq!(batch.to_string(), "[4,2][8,6]");
        assert_eq!(batch.describe(), "WrapCols (2,2)");

        batch.put_at(1, 0, 0.5).unwrap();
        assert_eq!(features.at(1, 3).unwrap(), 0.5);
    }

    #[test]
    fn test_wrap_boxed_columns() {
        let columns: Vec<Box<dyn Tensor>> = vec![
            Box::new(DenseTensor::from_vec(vec![1.0, 2.0])),
            Box::new(DenseTensor::from_vec(vec![3.0, 4.0])),
        ];
        let m = WrapCols::new(columns).unwrap();
        let product = m.matmul(&matrix![[1.0], [1.0]]).unwrap();
        assert_eq!(product.to_string(), "[4][6]");
        assert!(WrapCols::new(vec![DenseTensor::new(2), DenseTensor::new(3)]).is_err());
    }

    #[test]
    fn test_wrap_entries_follow_columns() {
        let sparse = SparseMatrix::from_triplets(3, 2, [(2, 0, 1.0), (0, 1, 2.0)]).unwrap();
        let wrapped = WrapCols::new(sparse.access_columns()).unwrap();
        assert_eq!(wrapped.non_zero_entries().count(), 6);
        assert_eq!(wrapped.zero_copy_shaped().describe(), "DenseMatrix (3,2)");

        let empty: WrapCols<DenseTensor> = WrapCols::new(Vec::new()).unwrap();
        assert_eq!((empty.rows(), empty.cols()), (0, 0));
    }
}
