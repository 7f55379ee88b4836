use super::{BatchOptimizer, Loss, Model};
use crate::{
    error::{GraphmatError, Result},
    matrix::{DenseMatrix, Matrix},
    tensor::Tensor,
};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;

/// A single dense layer without bias: `predict(X) = W * X`.
///
/// `W` has one row per output and one column per input feature; the columns
/// of `X` are samples.
#[derive(Debug)]
pub struct LinearModel {
    weights: Arc<DenseMatrix>,
    parameter: Arc<dyn Tensor>,
}

impl LinearModel {
    /// Gaussian initialization scaled by `1 / sqrt(features)`, reproducible
    /// from `seed`.
    pub fn new(features: usize, outputs: usize, seed: u64) -> Result<Self> {
        let weights = Arc::new(DenseMatrix::new(outputs, features));
        weights.set_to_random(&mut StdRng::seed_from_u64(seed))?;
        weights.self_scale(1.0 / (features.max(1) as f64).sqrt())?;
        let parameter: Arc<dyn Tensor> = weights.clone();
        Ok(Self { weights, parameter })
    }

    pub fn weights(&self) -> &DenseMatrix {
        &self.weights
    }

    pub fn predict(&self, features: &dyn Matrix) -> Result<Box<dyn Matrix>> {
        self.weights.matmul(features)
    }

    /// Mean loss of the current weights over `features` and `targets`.
    pub fn evaluate(&self, loss: Loss, features: &dyn Matrix, targets: &dyn Matrix) -> Result<f64> {
        let predictions = self.predict(features)?;
        loss.evaluate(&*predictions, targets)
    }

    fn train(
        &self,
        loss: Loss,
        optimizer: &BatchOptimizer,
        inputs: &[&dyn Matrix],
        outputs: &[&dyn Matrix],
    ) -> Result<()> {
        if inputs.len() != outputs.len() {
            return Err(GraphmatError::invalid_input(format!(
                "{} input matrices but {} output matrices",
                inputs.len(),
                outputs.len()
            )));
        }
        for (&input, &output) in inputs.iter().zip(outputs) {
            if input.cols() == 0 {
                continue;
            }
            let predictions = self.predict(input)?;
            let error = loss.derivative(&*predictions, output)?;
            // dL/dW = error * input^T
            let gradient = error.matmul_transposed(input, false, true)?;
            gradient.self_scale(1.0 / input.cols() as f64)?;
            optimizer.accumulate(&self.parameter, &*gradient)?;
        }
        Ok(())
    }
}

impl Model for LinearModel {
    fn train_l2(
        &self,
        optimizer: &BatchOptimizer,
        inputs: &[&dyn Matrix],
        outputs: &[&dyn Matrix],
    ) -> Result<()> {
        self.train(Loss::L2, optimizer, inputs, outputs)
    }

    fn train_cross_entropy(
        &self,
        optimizer: &BatchOptimizer,
        inputs: &[&dyn Matrix],
        outputs: &[&dyn Matrix],
    ) -> Result<()> {
        self.train(Loss::CrossEntropy, optimizer, inputs, outputs)
    }
}
