//! Training collaborators for `graphmat`.
//!
//! The training loop in [`crate::training`] only talks to models and
//! optimizers through the traits defined here. This module also carries a
//! plain gradient-descent optimizer, the batch accumulator that makes an
//! optimizer safe to share between concurrently running batches, and a small
//! linear model used to exercise the whole pipeline.

mod linear;
mod losses;
mod optimizers;

pub use linear::LinearModel;
pub use losses::{softmax_columns, Loss};
pub use optimizers::{BatchOptimizer, Sgd};

use crate::{error::Result, matrix::Matrix, tensor::Tensor};
use std::fmt;

/// An update rule applied to one parameter at a time.
///
/// Implementations are shared between worker threads and must be safe to
/// call concurrently for different parameters.
pub trait Optimizer: fmt::Debug + Send + Sync {
    /// Moves `value` according to `gradient`.
    fn update(&self, value: &dyn Tensor, gradient: &dyn Tensor) -> Result<()>;
}

/// A trainable model.
///
/// Each entry point receives the shared optimizer and lists of input and
/// output matrices whose columns are samples. Implementations push their
/// gradients into the optimizer with [`BatchOptimizer::accumulate`]; the
/// caller applies them afterwards with [`BatchOptimizer::update_all`].
pub trait Model: Send + Sync {
    /// Trains against squared-error loss.
    fn train_l2(
        &self,
        optimizer: &BatchOptimizer,
        inputs: &[&dyn Matrix],
        outputs: &[&dyn Matrix],
    ) -> Result<()>;

    /// Trains against softmax cross-entropy loss.
    fn train_cross_entropy(
        &self,
        optimizer: &BatchOptimizer,
        inputs: &[&dyn Matrix],
        outputs: &[&dyn Matrix],
    ) -> Result<()>;
}
