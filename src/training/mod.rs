//! Epoch/batch training loop.
//!
//! [`ModelTraining`] reshuffles the training samples once per epoch (seeded
//! by the epoch number), splits them into contiguous batches, wraps each
//! batch's feature and label columns into zero-copy matrices and hands them
//! to a [`Model`]. Batches run on the caller's thread or on a
//! [`WorkerPool`]; either way every batch of an epoch has finished before
//! the next epoch reshuffles.
//!
//! # Example
//!
//! ```
//! use graphmat::{matrix, nn::{LinearModel, Loss, Sgd}, training::ModelTraining};
//!
//! let features = matrix![[1.0, 0.0, 1.0, 0.0], [0.0, 1.0, 0.0, 1.0]];
//! let labels = matrix![[2.0, -1.0, 2.0, -1.0]];
//! let model = LinearModel::new(2, 1, 0).unwrap();
//! let mut samples: Vec<usize> = (0..4).collect();
//!
//! ModelTraining::new()
//!     .loss(Loss::L2)
//!     .optimizer(Sgd::new(0.5))
//!     .num_batches(2)
//!     .parallelization(false)
//!     .epochs(200)
//!     .train(&model, &features, &labels, &mut samples)
//!     .unwrap();
//!
//! let error = model.evaluate(Loss::L2, &features, &labels).unwrap();
//! assert!(error < 1e-6);
//! ```

mod pool;

pub use pool::{EpochScope, WorkerPool};

use crate::{
    error::{GraphmatError, Result},
    matrix::Matrix,
    nn::{BatchOptimizer, Loss, Model, Optimizer, Sgd},
    tensor::Tensor,
    view::{AccessCol, WrapCols},
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::ops::Range;
use tracing::{debug, info, trace};

/// Parameters for [`ModelTraining`].
///
/// Use struct construction with `..Default::default()` to override a few
/// fields.
#[derive(Debug, Clone)]
pub struct TrainingParams {
    /// Loss the model is trained against.
    pub loss: Loss,

    /// Number of batches each epoch is split into.
    pub num_batches: usize,

    /// Run the batches of an epoch concurrently on a worker pool.
    pub parallel: bool,

    pub epochs: usize,

    /// Worker threads created when no pool is supplied.
    ///
    /// - `0`: one per available core
    /// - `n > 0`: exactly `n` threads
    pub n_threads: usize,

    /// Learning rate of the default [`Sgd`] optimizer. Ignored once an
    /// optimizer is set explicitly.
    pub learning_rate: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            loss: Loss::L2,
            num_batches: 1,
            parallel: true,
            epochs: 150,
            n_threads: 0,
            learning_rate: 0.1,
        }
    }
}

/// Splits `samples` positions into `num_batches` contiguous ranges.
///
/// Every batch holds `samples / num_batches` positions except the last,
/// which also takes the remainder.
///
/// ```
/// use graphmat::training::batch_ranges;
///
/// assert_eq!(batch_ranges(10, 3).unwrap(), vec![0..3, 3..6, 6..10]);
/// ```
pub fn batch_ranges(samples: usize, num_batches: usize) -> Result<Vec<Range<usize>>> {
    if num_batches == 0 {
        return Err(GraphmatError::invalid_input("number of batches must be positive"));
    }
    let batch_size = samples / num_batches;
    Ok((0..num_batches)
        .map(|batch| {
            let start = batch * batch_size;
            let end = if batch + 1 == num_batches {
                samples
            } else {
                start + batch_size
            };
            start..end
        })
        .collect())
}

/// One batch of work: the model, the shared optimizer and zero-copy views of
/// the batch's columns.
struct BatchTask<'a, M: ?Sized> {
    model: &'a M,
    optimizer: &'a BatchOptimizer,
    loss: Loss,
    features: WrapCols<AccessCol<'a>>,
    labels: WrapCols<AccessCol<'a>>,
}

impl<'a, M: Model + ?Sized> BatchTask<'a, M> {
    fn run(self) -> Result<()> {
        let inputs: [&dyn Matrix; 1] = [&self.features];
        let outputs: [&dyn Matrix; 1] = [&self.labels];
        match self.loss {
            Loss::L2 => self.model.train_l2(self.optimizer, &inputs, &outputs)?,
            Loss::CrossEntropy => self
                .model
                .train_cross_entropy(self.optimizer, &inputs, &outputs)?,
        }
        self.optimizer.update_all()
    }
}

/// Builder-style training orchestrator.
#[derive(Debug, Default)]
pub struct ModelTraining {
    params: TrainingParams,
    optimizer: Option<BatchOptimizer>,
    pool: Option<WorkerPool>,
}

impl ModelTraining {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: TrainingParams) -> Self {
        Self {
            params,
            optimizer: None,
            pool: None,
        }
    }

    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    pub fn loss(mut self, loss: Loss) -> Self {
        self.params.loss = loss;
        self
    }

    /// Optimizer shared by all batches; gradients are accumulated through a
    /// [`BatchOptimizer`] around it.
    pub fn optimizer<O: Optimizer + 'static>(mut self, optimizer: O) -> Self {
        self.optimizer = Some(BatchOptimizer::new(optimizer));
        self
    }

    pub fn num_batches(mut self, num_batches: usize) -> Self {
        self.params.num_batches = num_batches;
        self
    }

    pub fn parallelization(mut self, parallel: bool) -> Self {
        self.params.parallel = parallel;
        self
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.params.epochs = epochs;
        self
    }

    /// Pool used for parallel batches instead of a freshly created one.
    pub fn worker_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Trains `model` on the columns of `features` and `labels` selected by
    /// `training_samples`.
    ///
    /// `training_samples` is reshuffled in place every epoch. The first error
    /// raised by a batch stops training once the running epoch's batches have
    /// finished.
    ///
    /// # Errors
    ///
    /// Fails before any training if `features` and `labels` differ in column
    /// count, a sample is not a column of both, or `num_batches` is zero.
    pub fn train<'m, M: Model + ?Sized>(
        &self,
        model: &'m M,
        features: &dyn Matrix,
        labels: &dyn Matrix,
        training_samples: &mut [usize],
    ) -> Result<&'m M> {
        if features.cols() != labels.cols() {
            return Err(GraphmatError::IncompatibleShapes(
                features.shape().dims(),
                labels.shape().dims(),
            ));
        }
        if let Some(&sample) = training_samples
            .iter()
            .find(|&&sample| sample >= features.cols())
        {
            return Err(GraphmatError::IndexOutOfBounds(sample, features.cols()));
        }
        let ranges = batch_ranges(training_samples.len(), self.params.num_batches)?;

        let default_optimizer;
        let optimizer = match &self.optimizer {
            Some(optimizer) => optimizer,
            None => {
                default_optimizer = BatchOptimizer::new(Sgd::new(self.params.learning_rate));
                &default_optimizer
            }
        };
        let pool = match (&self.pool, self.params.parallel) {
            (_, false) => None,
            (Some(pool), true) => Some(pool.clone()),
            (None, true) => Some(WorkerPool::new(self.params.n_threads)?),
        };

        info!(
            epochs = self.params.epochs,
            batches = self.params.num_batches,
            samples = training_samples.len(),
            parallel = pool.is_some(),
            loss = ?self.params.loss,
            "starting training"
        );
        for epoch in 0..self.params.epochs {
            training_samples.shuffle(&mut StdRng::seed_from_u64(epoch as u64));
            let mut tasks = Vec::with_capacity(ranges.len());
            for range in ranges.iter().filter(|range| !range.is_empty()) {
                let batch = &training_samples[range.clone()];
                tasks.push(BatchTask {
                    model,
                    optimizer,
                    loss: self.params.loss,
                    features: WrapCols::new(features.access_columns_at(batch)?)?,
                    labels: WrapCols::new(labels.access_columns_at(batch)?)?,
                });
            }
            debug!(epoch, batches = tasks.len(), "running epoch");

            match &pool {
                Some(pool) => pool.scope(|scope| {
                    for task in tasks {
                        trace!(epoch, samples = task.features.cols(), "submitting batch");
                        scope.submit(move || task.run());
                    }
                })?,
                None => {
                    for task in tasks {
                        trace!(epoch, samples = task.features.cols(), "running batch");
                        task.run()?;
                    }
                }
            }
        }
        info!(epochs = self.params.epochs, "finished training");
        Ok(model)
    }
}
