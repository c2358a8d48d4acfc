//! Errors specific to the graph engine.

use thiserror::Error;

/// Failure modes for graph operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// `sssp` was called with a negative distance bound.
    #[error("negative distance bound: {0}")]
    NegativeBound(f32),
    /// An edge was added with a negative weight.
    #[error("negative edge weight: {0}")]
    NegativeWeight(f32),
    /// An edge was added with a non-finite weight (NaN or infinite).
    #[error("non-finite edge weight: {0}")]
    NonFiniteWeight(f32),
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
