use samplebox_select::SelectError;
use thiserror::Error;

/// A result type for service errors
pub type Result<T> = std::result::Result<T, ServiceError>;

/// An error raised while serving selectors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// When no selector is registered under the requested name
    #[error("Unknown object: {0}")]
    UnknownObjectError(String),
    /// When the requested method is not exposed by the selector
    #[error("Unknown method {method} on {object}")]
    UnknownMethodError {
        /// name of the selector
        object: String,
        /// requested method
        method: String,
    },
    /// When positional arguments do not match the method signature
    #[error("Invalid arguments for {method}: {reason}")]
    ArgumentError {
        /// requested method
        method: String,
        /// what is wrong with the arguments
        reason: String,
    },
    /// When the selector operation fails
    #[error(transparent)]
    SelectError(#[from] SelectError),
    /// When a request is not valid JSON
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    /// When the connection fails
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
