use super::{check_matrix_size, Entries, Matrix};
use crate::{
    error::Result,
    storage::{SparseStorage, Storage},
    tensor::{Shape, Tensor},
};
use std::fmt;

/// A matrix storing only its non-zero entries.
///
/// Entries are enumerated in column-major order, so algebra over a sparse
/// operand costs time proportional to its stored entries.
#[derive(Debug)]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    storage: SparseStorage,
}

impl SparseMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            storage: SparseStorage::new(rows * cols),
        }
    }

    /// Builds a matrix from `(row, col, value)` triplets; later triplets overwrite earlier ones.
    pub fn from_triplets<I>(rows: usize, cols: usize, triplets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let ret = Self::new(rows, cols);
        for (row, col, value) in triplets {
            ret.put_at(row, col, value)?;
        }
        Ok(ret)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.storage.stored()
    }
}

impl Tensor for SparseMatrix {
    fn size(&self) -> usize {
        self.rows * self.cols
    }

    fn get(&self, pos: usize) -> Result<f64> {
        self.storage.get(pos)
    }

    fn put(&self, pos: usize, value: f64) -> Result<()> {
        self.storage.put(pos, value)
    }

    fn zero_copy_sized(&self, size: usize) -> Result<Box<dyn Tensor>> {
        check_matrix_size(self.rows, self.cols, size)?;
        Ok(Box::new(SparseMatrix::new(self.rows, self.cols)))
    }

    fn kind(&self) -> &'static str {
        "SparseMatrix"
    }

    fn shape(&self) -> Shape {
        Shape::Matrix {
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn non_zero_elements(&self) -> Vec<usize> {
        self.storage.non_zero_indices()
    }
}

impl Matrix for SparseMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn non_zero_entries(&self) -> Entries<'_> {
        let rows = self.rows;
        Box::new(
            self.storage
                .non_zero_indices()
                .into_iter()
                .map(move |pos| (pos % rows, pos / rows)),
        )
    }

    fn zero_copy_matrix(&self, rows: usize, cols: usize) -> Box<dyn Matrix> {
        Box::new(SparseMatrix::new(rows, cols))
    }

    fn as_matrix(&self) -> &dyn Matrix {
        self
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_matrix(), f)
    }
}
