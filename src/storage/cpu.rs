//! Contiguous storage backend.

use super::Storage;
use crate::error::{GraphmatError, Result};
use parking_lot::RwLock;

/// Dense storage using a simple `Vec`.
#[derive(Debug)]
pub struct DenseStorage {
    data: RwLock<Vec<f64>>,
}

impl DenseStorage {
    /// Create a zero-filled storage of the given length.
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![0.0; len])
    }

    /// Create a dense storage from a vector.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Copies the values out.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.read().clone()
    }
}

impl Storage for DenseStorage {
    fn len(&self) -> usize {
        self.data.read().len()
    }

    fn get(&self, index: usize) -> Result<f64> {
        let data = self.data.read();
        data.get(index)
            .copied()
            .ok_or(GraphmatError::IndexOutOfBounds(index, data.len()))
    }

    fn put(&self, index: usize, value: f64) -> Result<()> {
        let mut data = self.data.write();
        let len = data.len();
        match data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(GraphmatError::IndexOutOfBounds(index, len)),
        }
    }

    fn non_zero_indices(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    fn duplicate(&self) -> Self {
        Self::from_vec(self.to_vec())
    }
}
