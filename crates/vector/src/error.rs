//! Errors specific to the vector index.

use thiserror::Error;

/// Failure modes for the ANN vector index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VectorError {
    /// `add`/`search` was called with a vector of the wrong dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality the index was configured for.
        expected: usize,
        /// Dimensionality of the offending vector.
        actual: usize,
    },
    /// `add` was called with an id already present in the index.
    #[error("vector id {0} already present")]
    DuplicateId(u32),
}

/// Result alias for vector-index operations.
pub type Result<T> = std::result::Result<T, VectorError>;
