use super::{check_matrix_size, Entries, Matrix};
use crate::{
    error::{GraphmatError, Result},
    storage::{DenseStorage, Storage},
    tensor::{Shape, Tensor},
};
use std::fmt;

/// A matrix that owns a contiguous column-major buffer.
///
/// Every coordinate counts as a non-zero entry.
#[derive(Debug)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    storage: DenseStorage,
}

impl DenseMatrix {
    /// Creates an all-zero `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            storage: DenseStorage::zeros(rows * cols),
        }
    }

    /// Wraps column-major `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if `data.len() != rows * cols`.
    pub fn from_col_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(GraphmatError::shape_mismatch(vec![rows * cols], vec![data.len()]));
        }
        Ok(Self {
            rows,
            cols,
            storage: DenseStorage::from_vec(data),
        })
    }

    /// Builds a matrix from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        let ret = Self::new(num_rows, num_cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != num_cols {
                return Err(GraphmatError::shape_mismatch(vec![num_cols], vec![values.len()]));
            }
            for (col, &value) in values.iter().enumerate() {
                ret.put_at(row, col, value)?;
            }
        }
        Ok(ret)
    }

    /// A 1x1 matrix holding `value`.
    pub fn from_double(value: f64) -> Self {
        Self {
            rows: 1,
            cols: 1,
            storage: DenseStorage::from_vec(vec![value]),
        }
    }
}

impl Tensor for DenseMatrix {
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
        Ok(Box::new(DenseMatrix::new(self.rows, self.cols)))
    }

    fn kind(&self) -> &'static str {
        "DenseMatrix"
    }

    fn shape(&self) -> Shape {
        Shape::Matrix {
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn to_vec(&self) -> Result<Vec<f64>> {
        Ok(self.storage.to_vec())
    }
}

impl Matrix for DenseMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn non_zero_entries(&self) -> Entries<'_> {
        let rows = self.rows;
        Box::new((0..self.cols).flat_map(move |col| (0..rows).map(move |row| (row, col))))
    }

    fn zero_copy_matrix(&self, rows: usize, cols: usize) -> Box<dyn Matrix> {
        Box::new(DenseMatrix::new(rows, cols))
    }

    fn as_matrix(&self) -> &dyn Matrix {
        self
    }
}

impl Clone for DenseMatrix {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            storage: self.storage.duplicate(),
        }
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_matrix(), f)
    }
}
