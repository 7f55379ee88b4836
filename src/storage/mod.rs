//! Storage abstraction for tensor data.
//! This module provides the `Storage` trait and the dense and sparse backends
//! that own the values of every concrete tensor and matrix.
//!
//! Writes go through `&self`: the buffers sit behind a lock so that several
//! views of one matrix can read and write it at the same time.

mod cpu;
mod sparse;

pub use cpu::DenseStorage;
pub use sparse::SparseStorage;

use crate::error::Result;
use std::fmt::Debug;

/// A trait for tensor storage backends.
pub trait Storage: Debug + Send + Sync {
    /// Returns the number of addressable elements.
    fn len(&self) -> usize;

    /// Returns `true` if the storage has no addressable elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the value at `index`.
    fn get(&self, index: usize) -> Result<f64>;

    /// Writes `value` at `index`.
    fn put(&self, index: usize, value: f64) -> Result<()>;

    /// Linear indices the backend considers present, in ascending order.
    fn non_zero_indices(&self) -> Vec<usize>;

    /// Returns a new storage with the same data.
    fn duplicate(&self) -> Self
    where
        Self: Sized;
}
