use thiserror::Error;

/// A result type for regression forest algorithm
pub type Result<T> = std::result::Result<T, ForestError>;

/// An error when using [`RegressionForest`](crate::RegressionForest) algorithm
#[derive(Error, Debug)]
pub enum ForestError {
    /// When a hyperparameter has an invalid value
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
    /// When there is nothing to learn from
    #[error("Empty training dataset")]
    EmptyDatasetError,
    /// When prediction inputs do not match training inputs
    #[error("Dimension mismatch: expected {expected} input components, got {actual}")]
    DimensionMismatchError {
        /// Number of input components seen during training
        expected: usize,
        /// Number of input components given at prediction
        actual: usize,
    },
    /// When the worker pool used to grow trees cannot be set up
    #[error("Thread pool error: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),
    /// When a linfa error occurs
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
}
