use super::check_position;
use crate::{
    error::Result,
    matrix::Matrix,
    tensor::{DenseTensor, Tensor},
};

/// One row of a matrix viewed as a tensor of `cols` elements.
#[derive(Debug, Clone, Copy)]
pub struct AccessRow<'a> {
    matrix: &'a dyn Matrix,
    row: usize,
}

impl<'a> AccessRow<'a> {
    /// # Errors
    ///
    /// Returns an error if `row` is not a row of `matrix`.
    pub fn new(matrix: &'a dyn Matrix, row: usize) -> Result<Self> {
        check_position(row, matrix.rows())?;
        Ok(Self::unchecked(matrix, row))
    }

    pub(crate) fn unchecked(matrix: &'a dyn Matrix, row: usize) -> Self {
        Self { matrix, row }
    }

    pub fn row(&self) -> usize {
        self.row
    }
}

impl Tensor for AccessRow<'_> {
    fn size(&self) -> usize {
        self.matrix.cols()
    }

    fn get(&self, pos: usize) -> Result<f64> {
        check_position(pos, self.size())?;
        self.matrix.at(self.row, pos)
    }

    fn put(&self, pos: usize, value: f64) -> Result<()> {
        check_position(pos, self.size())?;
        self.matrix.put_at(self.row, pos, value)
    }

    fn zero_copy_sized(&self, size: usize) -> Result<Box<dyn Tensor>> {
        Ok(Box::new(DenseTensor::new(size)))
    }

    fn kind(&self) -> &'static str {
        "AccessRow"
    }
}

/// One column of a matrix viewed as a tensor of `rows` elements.
#[derive(Debug, Clone, Copy)]
pub struct AccessCol<'a> {
    matrix: &'a dyn Matrix,
    col: usize,
}

impl<'a> AccessCol<'a> {
    /// # Errors
    ///
    /// Returns an error if `col` is not a column of `matrix`.
    pub fn new(matrix: &'a dyn Matrix, col: usize) -> Result<Self> {
        check_position(col, matrix.cols())?;
        Ok(Self::unchecked(matrix, col))
    }

    pub(crate) fn unchecked(matrix: &'a dyn Matrix, col: usize) -> Self {
        Self { matrix, col }
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

impl Tensor for AccessCol<'_> {
    fn size(&self) -> usize {
        self.matrix.rows()
    }

    fn get(&self, pos: usize) -> Result<f64> {
        check_position(pos, self.size())?;
        self.matrix.at(pos, self.col)
    }

    fn put(&self, pos: usize, value: f64) -> Result<()> {
        check_position(pos, self.size())?;
        self.matrix.put_at(pos, self.col, value)
    }

    fn zero_copy_sized(&self, size: usize) -> Result<Box<dyn Tensor>> {
        Ok(Box::new(DenseTensor::new(size)))
    }

    fn kind(&self) -> &'static str {
        "AccessCol"
    }
}
