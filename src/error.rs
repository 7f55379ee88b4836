use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphmatError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Incompatible shapes for operation: {0:?} and {1:?}")]
    IncompatibleShapes(Vec<usize>, Vec<usize>),
    #[error("Index out of bounds: {0} for tensor of size {1}")]
    IndexOutOfBounds(usize, usize),
    #[error("Element out of range ({row},{col}) for {matrix}")]
    ElementOutOfRange {
        row: usize,
        col: usize,
        matrix: String,
    },
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl GraphmatError {
    pub fn shape_mismatch(expected: Vec<usize>, actual: Vec<usize>) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T, E = GraphmatError> = std::result::Result<T, E>;
