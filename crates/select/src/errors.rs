use thiserror::Error;

/// A result type for selector errors
pub type Result<T> = std::result::Result<T, SelectError>;

/// An error raised by sampling point selectors
#[derive(Error, Debug)]
pub enum SelectError {
    /// When an operation is called out of order or with invalid arguments
    #[error("Precondition violated: {0}")]
    PreconditionError(String),
    /// When no candidate honors even the most relaxed spacing constraint
    #[error("No valid point remains to be sampled")]
    ExhaustedError,
    /// When an operation is declared but not available for the selector
    #[error("Not implemented: {0}")]
    NotImplementedError(&'static str),
    /// When configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(String),
    /// When the uncertainty model fails
    #[error("Forest error: {0}")]
    ForestError(#[from] samplebox_forest::ForestError),
}
