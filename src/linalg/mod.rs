//! Linear algebra operations for matrices.
//!
//! Every function here walks the left operand through
//! [`Matrix::non_zero_entries`](crate::matrix::Matrix::non_zero_entries) and
//! checks shapes before allocating its result.

mod laplacian;
mod matmul;
mod transpose;

pub use laplacian::*;
pub use matmul::*;
pub use transpose::*;

use crate::{error::GraphmatError, matrix::Matrix};

fn dims(matrix: &dyn Matrix) -> Vec<usize> {
    vec![matrix.rows(), matrix.cols()]
}

fn incompatible(lhs: &dyn Matrix, rhs: &dyn Matrix) -> GraphmatError {
    GraphmatError::IncompatibleShapes(dims(lhs), dims(rhs))
}
