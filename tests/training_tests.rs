//! Integration tests for the training loop.

use graphmat::{
    batch_ranges,
    nn::{LinearModel, Loss, Sgd},
    BatchOptimizer, DenseMatrix, GraphmatError, Matrix, Model, ModelTraining, Result, Tensor,
    WorkerPool,
};
use parking_lot::Mutex;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Records the sample ids of every batch it is trained on.
#[derive(Default)]
struct Recorder {
    batches: Mutex<Vec<Vec<usize>>>,
}

impl Model for Recorder {
    fn train_l2(
        &self,
        _optimizer: &BatchOptimizer,
        inputs: &[&dyn Matrix],
        outputs: &[&dyn Matrix],
    ) -> Result<()> {
        assert_eq!((inputs.len(), outputs.len()), (1, 1));
        let ids = inputs[0].to_vec()?;
        let labels = outputs[0].to_vec()?;
        assert_eq!(labels, ids.iter().map(|id| id * 10.0).collect::<Vec<_>>());
        self.batches
            .lock()
            .push(ids.into_iter().map(|id| id as usize).collect());
        Ok(())
    }

    fn train_cross_entropy(
        &self,
        optimizer: &BatchOptimizer,
        inputs: &[&dyn Matrix],
        outputs: &[&dyn Matrix],
    ) -> Result<()> {
        self.train_l2(optimizer, inputs, outputs)
    }
}

/// Fails every batch.
#[derive(Default)]
struct Failing {
    calls: AtomicUsize,
}

impl Model for Failing {
    fn train_l2(&self, _: &BatchOptimizer, _: &[&dyn Matrix], _: &[&dyn Matrix]) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GraphmatError::invalid_input("diverged"))
    }

    fn train_cross_entropy(
        &self,
        optimizer: &BatchOptimizer,
        inputs: &[&dyn Matrix],
        outputs: &[&dyn Matrix],
    ) -> Result<()> {
        self.train_l2(optimizer, inputs, outputs)
    }
}

struct Panicking;

impl Model for Panicking {
    fn train_l2(&self, _: &BatchOptimizer, _: &[&dyn Matrix], _: &[&dyn Matrix]) -> Result<()> {
        panic!("batch blew up")
    }

    fn train_cross_entropy(&self, _: &BatchOptimizer, _: &[&dyn Matrix], _: &[&dyn Matrix]) -> Result<()> {
        panic!("batch blew up")
    }
}

/// One feature row holding the sample id, one label row holding ten times it.
fn id_data(samples: usize) -> (DenseMatrix, DenseMatrix) {
    let ids: Vec<f64> = (0..samples).map(|id| id as f64).collect();
    let labels = ids.iter().map(|id| id * 10.0).collect();
    (
        DenseMatrix::from_col_major(1, samples, ids).unwrap(),
        DenseMatrix::from_col_major(1, samples, labels).unwrap(),
    )
}

fn record(training: ModelTraining, samples: usize) -> Vec<Vec<usize>> {
    let (features, labels) = id_data(samples);
    let recorder = Recorder::default();
    let mut training_samples: Vec<usize> = (0..samples).collect();
    training
        .train(&recorder, &features, &labels, &mut training_samples)
        .unwrap();
    recorder.batches.into_inner()
}

/// 25 points on a grid over `[-1, 1]^2`, features stored as columns.
fn grid() -> Vec<(f64, f64)> {
    (0..5)
        .flat_map(|i| (0..5).map(move |j| (i as f64 / 2.0 - 1.0, j as f64 / 2.0 - 1.0)))
        .collect()
}

fn grid_features() -> DenseMatrix {
    let data = grid().into_iter().flat_map(|(x, y)| [x, y]).collect();
    DenseMatrix::from_col_major(2, 25, data).unwrap()
}

#[test]
fn test_remainder_goes_to_last_batch() {
    assert_eq!(batch_ranges(10, 3).unwrap(), vec![0..3, 3..6, 6..10]);
    assert_eq!(batch_ranges(3, 3).unwrap(), vec![0..1, 1..2, 2..3]);
}

#[test]
fn test_shuffle_is_seeded_by_epoch() {
    let training = ModelTraining::new().parallelization(false).epochs(2);
    let batches = record(training, 10);
    assert_eq!(batches.len(), 2);

    let mut expected: Vec<usize> = (0..10).collect();
    expected.shuffle(&mut StdRng::seed_from_u64(0));
    assert_eq!(batches[0], expected);
    expected.shuffle(&mut StdRng::seed_from_u64(1));
    assert_eq!(batches[1], expected);
}

#[test]
fn test_repeated_runs_see_same_batches() {
    let first = record(ModelTraining::new().parallelization(false).num_batches(3).epochs(4), 10);
    let second = record(ModelTraining::new().parallelization(false).num_batches(3).epochs(4), 10);
    assert_eq!(first, second);
    let sizes: Vec<usize> = first[..3].iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 3, 4]);
}

#[test]
fn test_parallel_epochs_do_not_overlap() {
    let pool = WorkerPool::new(4).unwrap();
    let training = ModelTraining::new()
        .num_batches(3)
        .epochs(6)
        .worker_pool(pool);
    let batches = record(training, 10);
    assert_eq!(batches.len(), 18);
    for epoch in batches.chunks(3) {
        let mut ids: Vec<usize> = epoch.iter().flatten().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        let mut sizes: Vec<usize> = epoch.iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 3, 4]);
    }
}

#[test]
fn test_only_selected_samples_are_used() {
    let (features, labels) = id_data(8);
    let recorder = Recorder::default();
    let mut samples: Vec<usize> = vec![1, 3, 5];
    ModelTraining::new()
        .parallelization(false)
        .num_batches(2)
        .epochs(3)
        .train(&recorder, &features, &labels, &mut samples)
        .unwrap();
    let batches = recorder.batches.into_inner();
    assert_eq!(batches.len(), 6);
    for epoch in batches.chunks(2) {
        assert_eq!((epoch[0].len(), epoch[1].len()), (1, 2));
        let mut ids: Vec<usize> = epoch.iter().flatten().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3, 5]);
    }
    samples.sort_unstable();
    assert_eq!(samples, vec![1, 3, 5]);
}

#[test]
fn test_empty_batches_are_skipped() {
    let batches = record(ModelTraining::new().parallelization(false).num_batches(4).epochs(1), 2);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 2);
}

#[test]
fn test_batch_error_stops_training() {
    let (features, labels) = id_data(8);

    let sequential = Failing::default();
    let result = ModelTraining::new()
        .parallelization(false)
        .num_batches(4)
        .epochs(3)
        .train(&sequential, &features, &labels, &mut (0..8usize).collect::<Vec<_>>());
    assert!(matches!(result, Err(GraphmatError::InvalidInput(_))));
    assert_eq!(sequential.calls.load(Ordering::SeqCst), 1);

    let parallel = Failing::default();
    let result = ModelTraining::new()
        .num_batches(4)
        .epochs(3)
        .worker_pool(WorkerPool::new(2).unwrap())
        .train(&parallel, &features, &labels, &mut (0..8usize).collect::<Vec<_>>());
    assert!(matches!(result, Err(GraphmatError::InvalidInput(_))));
    assert_eq!(parallel.calls.load(Ordering::SeqCst), 4);
}

#[test]
#[should_panic]
fn test_batch_panic_propagates() {
    let (features, labels) = id_data(4);
    let _ = ModelTraining::new()
        .num_batches(2)
        .epochs(1)
        .worker_pool(WorkerPool::new(2).unwrap())
        .train(&Panicking, &features, &labels, &mut [0, 1, 2, 3]);
}

#[test]
fn test_single_batch_parallel_matches_sequential() {
    let features = grid_features();
    let targets: Vec<f64> = grid().into_iter().map(|(x, y)| x - 3.0 * y).collect();
    let labels = DenseMatrix::from_col_major(1, 25, targets).unwrap();

    let train = |parallel: bool| {
        let model = LinearModel::new(2, 1, 11).unwrap();
        let mut samples: Vec<usize> = (0..25).collect();
        ModelTraining::new()
            .optimizer(Sgd::new(0.3))
            .parallelization(parallel)
            .epochs(20)
            .train(&model, &features, &labels, &mut samples)
            .unwrap();
        model.weights().to_vec().unwrap()
    };
    assert_eq!(train(false), train(true));
}

#[test]
fn test_parallel_regression_converges() {
    let features = grid_features();
    let targets: Vec<f64> = grid().into_iter().map(|(x, y)| 2.0 * x - y).collect();
    let labels = DenseMatrix::from_col_major(1, 25, targets).unwrap();
    let model = LinearModel::new(2, 1, 3).unwrap();
    let mut samples: Vec<usize> = (0..25).collect();

    ModelTraining::new()
        .loss(Loss::L2)
        .optimizer(Sgd::new(0.5))
        .num_batches(4)
        .epochs(100)
        .worker_pool(WorkerPool::new(3).unwrap())
        .train(&model, &features, &labels, &mut samples)
        .unwrap();

    assert!(model.evaluate(Loss::L2, &features, &labels).unwrap() < 1e-4);
    assert!((model.weights().at(0, 0).unwrap() - 2.0).abs() < 1e-2);
    assert!((model.weights().at(0, 1).unwrap() + 1.0).abs() < 1e-2);
}

#[test]
fn test_cross_entropy_loss_decreases() {
    let features = grid_features();
    let labels = DenseMatrix::new(2, 25);
    for (sample, (x, y)) in grid().into_iter().enumerate() {
        let class = if x > y { 0 } else { 1 };
        labels.put_at(class, sample, 1.0).unwrap();
    }
    let model = LinearModel::new(2, 2, 5).unwrap();
    let before = model.evaluate(Loss::CrossEntropy, &features, &labels).unwrap();

    let mut samples: Vec<usize> = (0..25).collect();
    ModelTraining::new()
        .loss(Loss::CrossEntropy)
        .optimizer(Sgd::new(0.5))
        .num_batches(5)
        .epochs(30)
        .worker_pool(WorkerPool::new(2).unwrap())
        .train(&model, &features, &labels, &mut samples)
        .unwrap();

    let after = model.evaluate(Loss::CrossEntropy, &features, &labels).unwrap();
    assert!(after < before, "loss went from {} to {}", before, after);
    assert!(after < 0.5);
}
