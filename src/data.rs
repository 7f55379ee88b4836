//! Training data producer.
//!
//! A [`Dataset`] is a features matrix and a labels matrix whose columns are
//! samples, plus the sample indices selected for training.

use crate::{
    error::{GraphmatError, Result},
    matrix::{DenseMatrix, Matrix},
};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Dataset {
    features: DenseMatrix,
    labels: DenseMatrix,
    training_samples: Vec<usize>,
}

impl Dataset {
    /// Uses every sample for training.
    ///
    /// # Errors
    ///
    /// Returns an error if `features` and `labels` differ in column count.
    pub fn new(features: DenseMatrix, labels: DenseMatrix) -> Result<Self> {
        if features.cols() != labels.cols() {
            return Err(GraphmatError::invalid_input(format!(
                "{} feature columns but {} label columns",
                features.cols(),
                labels.cols()
            )));
        }
        let training_samples = (0..features.cols()).collect();
        Ok(Self {
            features,
            labels,
            training_samples,
        })
    }

    /// Reads comma-separated records of numeric features followed by one
    /// target column. The first line is a header.
    ///
    /// With `label_classes` set, the target is a class id one-hot encoded
    /// into that many label rows; otherwise labels have a single row.
    /// Malformed records are logged and skipped.
    ///
    /// # Errors
    ///
    /// Only reading from `reader` can fail.
    pub fn from_csv<R: BufRead>(reader: R, label_classes: Option<usize>) -> Result<Self> {
        let mut features = Vec::new();
        let mut targets = Vec::new();
        let mut arity = None;
        let mut read = 0usize;

        for (index, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            read += 1;
            let record = match parse_record(&line, arity, label_classes) {
                Ok(record) => record,
                Err(reason) => {
                    warn!(line = line_number, %reason, "skipping malformed record");
                    continue;
                }
            };
            arity = Some(record.len());
            let (target, values) = match record.split_last() {
                Some((target, values)) => (*target, values),
                None => continue,
            };
            features.extend_from_slice(values);
            targets.push(target);
        }

        let samples = targets.len();
        let num_features = arity.map_or(0, |arity| arity - 1);
        info!(read, kept = samples, features = num_features, "loaded dataset");

        let features = DenseMatrix::from_col_major(num_features, samples, features)?;
        let labels = match label_classes {
            None => DenseMatrix::from_col_major(1, samples, targets)?,
            Some(classes) => {
                let labels = DenseMatrix::new(classes, samples);
                for (sample, class) in targets.into_iter().enumerate() {
                    labels.put_at(class as usize, sample, 1.0)?;
                }
                labels
            }
        };
        Self::new(features, labels)
    }

    /// Opens `path` and reads it with [`Dataset::from_csv`].
    pub fn from_path<P: AsRef<Path>>(path: P, label_classes: Option<usize>) -> Result<Self> {
        Self::from_csv(BufReader::new(File::open(path)?), label_classes)
    }

    /// Features, one column per sample.
    pub fn features(&self) -> &DenseMatrix {
        &self.features
    }

    /// Targets, one column per sample.
    pub fn labels(&self) -> &DenseMatrix {
        &self.labels
    }

    pub fn training_samples(&self) -> &[usize] {
        &self.training_samples
    }

    pub fn samples(&self) -> usize {
        self.features.cols()
    }
}

fn parse_record(
    line: &str,
    arity: Option<usize>,
    label_classes: Option<usize>,
) -> Result<Vec<f64>, String> {
    let record = line
        .split(',')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<f64>()
                .map_err(|_| format!("{:?} is not a number", field))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    if record.len() < 2 {
        return Err("expected at least one feature and a target".to_string());
    }
    if let Some(arity) = arity {
        if record.len() != arity {
            return Err(format!("expected {} fields, found {}", arity, record.len()));
        }
    }
    if let (Some(classes), Some(&target)) = (label_classes, record.last()) {
        if target.fract() != 0.0 || target < 0.0 || target >= classes as f64 {
            return Err(format!("class {} is not in 0..{}", target, classes));
        }
    }
    Ok(record)
}
