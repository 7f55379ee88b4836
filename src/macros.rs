//! Macros for creating tensors and matrices with a convenient syntax.

/// Creates a [`DenseMatrix`](crate::matrix::DenseMatrix) from rows of values.
///
/// # Examples
/// ```
/// use graphmat::{matrix, Matrix};
///
/// let m = matrix![[1.0, 2.0], [3.0, 4.0]];
/// assert_eq!((m.rows(), m.cols()), (2, 2));
/// assert_eq!(m.at(1, 0).unwrap(), 3.0);
/// ```
///
/// # Panics
///
/// Panics if the rows have different lengths.
#[macro_export]
macro_rules! matrix {
    ($([$($x:expr),* $(,)?]),+ $(,)?) => {
        $crate::matrix::DenseMatrix::from_rows(vec![$(vec![$($x as f64),*]),+])
            .expect("matrix! rows must have equal length")
    };
}

/// Creates a [`DenseTensor`](crate::tensor::DenseTensor) from values.
///
/// # Examples
/// ```
/// use graphmat::{vector, Tensor};
///
/// let v = vector![1.0, 2.0, 3.0];
/// assert_eq!(v.size(), 3);
/// ```
#[macro_export]
macro_rules! vector {
    ($($x:expr),* $(,)?) => {
        $crate::tensor::DenseTensor::from_vec(vec![$($x as f64),*])
    };
}
