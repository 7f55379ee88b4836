//! Core one-dimensional tensor contract.
//!
//! Every numeric container in `graphmat` (owned tensors, matrices and the
//! zero-copy views over them) implements [`Tensor`]. Elements are `f64`
//! values addressed by a 0-based linear index; the size never changes after
//! construction.

mod dense;

pub use dense::DenseTensor;

use crate::error::{GraphmatError, Result};
use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use std::fmt;

/// Structural shape of a container.
///
/// Compatibility checks between containers compare shapes instead of asking
/// which concrete type they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Vector { size: usize },
    Matrix { rows: usize, cols: usize },
}

impl Shape {
    /// Total number of addressable elements.
    pub fn size(&self) -> usize {
        match *self {
            Shape::Vector { size } => size,
            Shape::Matrix { rows, cols } => rows * cols,
        }
    }

    /// Dimensions as a vector, used in error reports.
    pub fn dims(&self) -> Vec<usize> {
        match *self {
            Shape::Vector { size } => vec![size],
            Shape::Matrix { rows, cols } => vec![rows, cols],
        }
    }

    /// Two matrices match only on equal dimensions; a matrix matches a plain
    /// vector only when it is a row or column vector of the same length.
    pub fn matches(&self, other: &Shape) -> bool {
        match (*self, *other) {
            (Shape::Vector { size: a }, Shape::Vector { size: b }) => a == b,
            (Shape::Matrix { rows: r1, cols: c1 }, Shape::Matrix { rows: r2, cols: c2 }) => {
                r1 == r2 && c1 == c2
            }
            (Shape::Matrix { rows, cols }, Shape::Vector { size })
            | (Shape::Vector { size }, Shape::Matrix { rows, cols }) => {
                (rows == 1 || cols == 1) && rows * cols == size
            }
        }
    }
}

/// A fixed-size sequence of `f64` values.
pub trait Tensor: fmt::Debug + Send + Sync {
    /// Number of elements.
    fn size(&self) -> usize;

    /// Reads the element at linear position `pos`.
    fn get(&self, pos: usize) -> Result<f64>;

    /// Writes the element at linear position `pos`.
    fn put(&self, pos: usize, value: f64) -> Result<()>;

    /// Creates a zero-filled container of the same kind holding `size` elements.
    ///
    /// Fixed-shape kinds fail unless `size` equals their own size.
    fn zero_copy_sized(&self, size: usize) -> Result<Box<dyn Tensor>>;

    /// Name of the concrete kind, used by [`Tensor::describe`].
    fn kind(&self) -> &'static str;

    fn shape(&self) -> Shape {
        Shape::Vector { size: self.size() }
    }

    /// Linear positions the backing store considers present.
    fn non_zero_elements(&self) -> Vec<usize> {
        (0..self.size()).collect()
    }

    /// Debug description with kind and dimensions.
    fn describe(&self) -> String {
        match self.shape() {
            Shape::Vector { size } => format!("{} ({})", self.kind(), size),
            Shape::Matrix { rows, cols } => format!("{} ({},{})", self.kind(), rows, cols),
        }
    }

    fn zero_copy(&self) -> Result<Box<dyn Tensor>> {
        self.zero_copy_sized(self.size())
    }

    /// Deep copy of the values into a new container of the same kind.
    fn copy(&self) -> Result<Box<dyn Tensor>> {
        let ret = self.zero_copy()?;
        for pos in self.non_zero_elements() {
            ret.put(pos, self.get(pos)?)?;
        }
        Ok(ret)
    }

    fn assert_size(&self, size: usize) -> Result<()> {
        if self.size() != size {
            return Err(GraphmatError::shape_mismatch(vec![size], vec![self.size()]));
        }
        Ok(())
    }

    fn is_matching(&self, other: &dyn Tensor) -> bool {
        self.shape().matches(&other.shape())
    }

    fn assert_matching(&self, other: &dyn Tensor) -> Result<()> {
        if !self.is_matching(other) {
            return Err(GraphmatError::shape_mismatch(
                self.shape().dims(),
                other.shape().dims(),
            ));
        }
        Ok(())
    }

    /// In-place element-wise multiplication.
    ///
    /// A matrix multiplied by a tensor of `cols` elements scales each column
    /// by the matching factor. A single-element operand scales everything.
    /// Otherwise the shapes must match.
    fn self_multiply(&self, other: &dyn Tensor) -> Result<()> {
        if let Shape::Matrix { rows, cols } = self.shape() {
            if other.size() == cols {
                let factors = other.to_vec()?;
                for pos in self.non_zero_elements() {
                    self.put(pos, self.get(pos)? * factors[pos / rows])?;
                }
                return Ok(());
            }
        }
        if other.size() == 1 {
            return self.self_scale(other.get(0)?);
        }
        self.assert_matching(other)?;
        for pos in self.non_zero_elements() {
            self.put(pos, self.get(pos)? * other.get(pos)?)?;
        }
        Ok(())
    }

    /// In-place element-wise addition of a matching tensor.
    fn self_add(&self, other: &dyn Tensor) -> Result<()> {
        self.assert_matching(other)?;
        for pos in other.non_zero_elements() {
            self.put(pos, self.get(pos)? + other.get(pos)?)?;
        }
        Ok(())
    }

    fn self_scale(&self, factor: f64) -> Result<()> {
        for pos in self.non_zero_elements() {
            self.put(pos, self.get(pos)? * factor)?;
        }
        Ok(())
    }

    fn sum(&self) -> Result<f64> {
        self.non_zero_elements()
            .into_iter()
            .map(|pos| self.get(pos))
            .sum()
    }

    /// Euclidean norm.
    fn norm(&self) -> Result<f64> {
        let mut sum = 0.0;
        for pos in self.non_zero_elements() {
            let value = self.get(pos)?;
            sum += value * value;
        }
        Ok(sum.sqrt())
    }

    fn to_vec(&self) -> Result<Vec<f64>> {
        (0..self.size()).map(|pos| self.get(pos)).collect()
    }

    /// Overwrites every element with a standard normal sample.
    fn set_to_random(&self, rng: &mut dyn RngCore) -> Result<()> {
        for pos in 0..self.size() {
            let value: f64 = StandardNormal.sample(&mut *rng);
            self.put(pos, value)?;
        }
        Ok(())
    }

    fn set_to_ones(&self) -> Result<()> {
        for pos in 0..self.size() {
            self.put(pos, 1.0)?;
        }
        Ok(())
    }

    /// Value of a single-element tensor.
    fn to_double(&self) -> Result<f64> {
        self.assert_size(1)?;
        self.get(0)
    }
}

impl<T: Tensor + ?Sized> Tensor for Box<T> {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn get(&self, pos: usize) -> Result<f64> {
        (**self).get(pos)
    }

    fn put(&self, pos: usize, value: f64) -> Result<()> {
        (**self).put(pos, value)
    }

    fn zero_copy_sized(&self, size: usize) -> Result<Box<dyn Tensor>> {
        (**self).zero_copy_sized(size)
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn non_zero_elements(&self) -> Vec<usize> {
        (**self).non_zero_elements()
    }
}

impl fmt::Display for dyn Tensor + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.to_vec().map_err(|_| fmt::Error)?;
        write!(f, "[")?;
        for (i, value) in values.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
