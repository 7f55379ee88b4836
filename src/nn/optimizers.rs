//! Optimization algorithms for training models.
//!
//! # Available Optimizers
//! - [`Sgd`]: plain gradient descent
//! - [`BatchOptimizer`]: accumulates gradients from any number of batches and
//!   applies their average through a wrapped optimizer
//!
//! # Usage Example
//! ```
//! use graphmat::{nn::{BatchOptimizer, Sgd}, Tensor, vector};
//! use std::sync::Arc;
//!
//! let weights: Arc<dyn Tensor> = Arc::new(vector![1.0, 1.0]);
//! let optimizer = BatchOptimizer::new(Sgd::new(0.5));
//! optimizer.accumulate(&weights, &vector![1.0, 0.0]).unwrap();
//! optimizer.accumulate(&weights, &vector![1.0, 2.0]).unwrap();
//! optimizer.update_all().unwrap();
//! assert_eq!(weights.to_vec().unwrap(), vec![0.5, 0.5]);
//! ```

use super::Optimizer;
use crate::{error::Result, tensor::Tensor};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Gradient descent: `value -= learning_rate * gradient`.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Optimizer for Sgd {
    fn update(&self, value: &dyn Tensor, gradient: &dyn Tensor) -> Result<()> {
        value.assert_matching(gradient)?;
        for pos in gradient.non_zero_elements() {
            value.put(pos, value.get(pos)? - self.learning_rate * gradient.get(pos)?)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Accumulated {
    parameter: Arc<dyn Tensor>,
    gradient: Box<dyn Tensor>,
    count: usize,
}

/// Collects gradients per parameter and applies them in one step.
///
/// Both accumulation and application hold the same lock, so batches running
/// on different threads never interleave their writes to a parameter.
#[derive(Debug)]
pub struct BatchOptimizer {
    base: Box<dyn Optimizer>,
    pending: Mutex<Vec<Accumulated>>,
}

impl BatchOptimizer {
    pub fn new<O: Optimizer + 'static>(base: O) -> Self {
        Self::from_boxed(Box::new(base))
    }

    pub fn from_boxed(base: Box<dyn Optimizer>) -> Self {
        Self {
            base,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Adds `gradient` to the sum kept for `parameter`.
    pub fn accumulate(&self, parameter: &Arc<dyn Tensor>, gradient: &dyn Tensor) -> Result<()> {
        parameter.assert_matching(gradient)?;
        let mut pending = self.pending.lock();
        match pending
            .iter_mut()
            .find(|entry| Arc::ptr_eq(&entry.parameter, parameter))
        {
            Some(entry) => {
                entry.gradient.self_add(gradient)?;
                entry.count += 1;
            }
            None => pending.push(Accumulated {
                parameter: Arc::clone(parameter),
                gradient: gradient.copy()?,
                count: 1,
            }),
        }
        Ok(())
    }

    /// Applies the average accumulated gradient of every parameter and clears the accumulator.
    pub fn update_all(&self) -> Result<()> {
        let mut pending = self.pending.lock();
        trace!(parameters = pending.len(), "applying accumulated gradients");
        for entry in pending.drain(..) {
            entry.gradient.self_scale(1.0 / entry.count as f64)?;
            self.base.update(&*entry.parameter, &*entry.gradient)?;
        }
        Ok(())
    }

    /// Number of parameters with pending gradients.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}
