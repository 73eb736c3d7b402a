use thiserror::Error;

/// Error type for traversal operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraversalError {
    #[error("Key '{0}' not found")]
    KeyNotFound(String),
    #[error("Index {0} out of range")]
    IndexOutOfRange(usize),
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Result type for traversal operations
pub type TraversalResult<T> = Result<T, TraversalError>;
