//! `graphmat` is a small linear-algebra engine for training graph neural
//! networks.
//!
//! It provides:
//! - A [`Tensor`]/[`Matrix`] contract over `f64` values with dense and sparse
//!   backends
//! - Zero-copy views (transposed matrices, rows, columns, wrapped column
//!   lists) that read and write their backing matrix
//! - Matrix products with implicit transposition and symmetric Laplacian
//!   normalization
//! - A batched training loop that can spread the batches of each epoch over a
//!   [`WorkerPool`]
//!
//! # Example
//!
//! ```
//! use graphmat::{matrix, Matrix, SparseMatrix};
//!
//! let adjacency = SparseMatrix::from_triplets(3, 3, [(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (2, 1, 1.0)]).unwrap();
//! let normalized = adjacency.laplacian().unwrap();
//! assert_eq!(normalized.at(0, 1).unwrap(), 1.0 / 2f64.sqrt());
//!
//! let features = matrix![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
//! let propagated = normalized.matmul(&features).unwrap();
//! assert_eq!((propagated.rows(), propagated.cols()), (3, 2));
//! ```

#[macro_use]
mod macros;

pub mod data;
pub mod error;
pub mod linalg;
pub mod matrix;
pub mod nn;
pub mod storage;
pub mod tensor;
pub mod training;
pub mod view;

pub use data::Dataset;
pub use error::{GraphmatError, Result};
pub use matrix::{external, DenseMatrix, Entries, Matrix, SparseMatrix};
pub use nn::{BatchOptimizer, Loss, Model, Optimizer, Sgd};
pub use tensor::{DenseTensor, Shape, Tensor};
pub use training::{batch_ranges, ModelTraining, TrainingParams, WorkerPool};
pub use view::{AccessCol, AccessRow, TransposedMatrix, WrapCols};
