//! Error types for the Tessera retrieval core.
//!
//! This module defines the unified error type used across all crates in the
//! workspace. We use `thiserror` for `Display`/`Error` derivation, matching
//! the error kinds enumerated in the retrieval core's error-handling design:
//! `InvalidArgument`, `DeadlineExceeded`, `Exhausted`, `NotFound`.
//!
//! Every error carries a short reason string; there are no stack traces in
//! the contract.

use thiserror::Error;

/// Result type alias for Tessera operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the retrieval core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller supplied an invalid argument: empty query text, dimension
    /// mismatch, weights outside `1 ± 0.01`, negative `k`/`hops`, or a
    /// duplicate document id on ingestion.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A sub-search did not complete before the caller's deadline. May
    /// carry whatever partial fusion had been computed so far.
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// An allocator or internal pool capacity was exceeded.
    #[error("resource exhausted: {0}")]
    Exhausted(String),

    /// A queried-for document id was not present in the index.
    #[error("not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Construct an `InvalidArgument` error with the given reason.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument(reason.into())
    }

    /// Construct a `DeadlineExceeded` error with the given reason.
    pub fn deadline_exceeded(reason: impl Into<String>) -> Self {
        Error::DeadlineExceeded(reason.into())
    }

    /// Construct an `Exhausted` error with the given reason.
    pub fn exhausted(reason: impl Into<String>) -> Self {
        Error::Exhausted(reason.into())
    }

    /// Construct a `NotFound` error with the given reason.
    pub fn not_found(reason: impl Into<String>) -> Self {
        Error::NotFound(reason.into())
    }

    /// True if retrying the same call with a longer deadline might succeed.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Error::DeadlineExceeded(_))
    }

    /// Short machine-readable kind name, used for per-error-kind metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::DeadlineExceeded(_) => "deadline_exceeded",
            Error::Exhausted(_) => "exhausted",
            Error::NotFound(_) => "not_found",
        }
    }
}
