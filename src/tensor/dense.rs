use super::Tensor;
use crate::{
    error::Result,
    storage::{DenseStorage, Storage},
};

/// A tensor that owns a contiguous buffer.
#[derive(Debug)]
pub struct DenseTensor {
    storage: DenseStorage,
}

impl DenseTensor {
    /// Creates a zero-filled tensor.
    pub fn new(size: usize) -> Self {
        Self {
            storage: DenseStorage::zeros(size),
        }
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            storage: DenseStorage::from_vec(values),
        }
    }
}

impl Tensor for DenseTensor {
    fn size(&self) -> usize {
        self.storage.len()
    }

    fn get(&self, pos: usize) -> Result<f64> {
        self.storage.get(pos)
    }

    fn put(&self, pos: usize, value: f64) -> Result<()> {
        self.storage.put(pos, value)
    }

    fn zero_copy_sized(&self, size: usize) -> Result<Box<dyn Tensor>> {
        Ok(Box::new(DenseTensor::new(size)))
    }

    fn kind(&self) -> &'static str {
        "DenseTensor"
    }

    fn to_vec(&self) -> Result<Vec<f64>> {
        Ok(self.storage.to_vec())
    }
}

impl Clone for DenseTensor {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.duplicate(),
        }
    }
}

impl From<Vec<f64>> for DenseTensor {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}
