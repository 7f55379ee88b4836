//! Map-backed storage that only keeps explicitly written entries.

use super::Storage;
use crate::error::{GraphmatError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Sparse storage keyed by linear index.
///
/// Writing exactly `0.0` drops the entry, so the stored set always matches the
/// structurally non-zero elements.
#[derive(Debug)]
pub struct SparseStorage {
    len: usize,
    entries: RwLock<BTreeMap<usize, f64>>,
}

impl SparseStorage {
    /// Create an empty storage addressing `len` elements.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored entries.
    pub fn stored(&self) -> usize {
        self.entries.read().len()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(GraphmatError::IndexOutOfBounds(index, self.len));
        }
        Ok(())
    }
}

impl Storage for SparseStorage {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Result<f64> {
        self.check(index)?;
        Ok(self.entries.read().get(&index).copied().unwrap_or(0.0))
    }

    fn put(&self, index: usize, value: f64) -> Result<()> {
        self.check(index)?;
        let mut entries = self.entries.write();
        if value == 0.0 {
            entries.remove(&index);
        } else {
            entries.insert(index, value);
        }
        Ok(())
    }

    fn non_zero_indices(&self) -> Vec<usize> {
        self.entries.read().keys().copied().collect()
    }

    fn duplicate(&self) -> Self {
        Self {
            len: self.len,
            entries: RwLock::new(self.entries.read().clone()),
        }
    }
}
