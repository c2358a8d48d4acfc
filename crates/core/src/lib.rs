//! Core types shared across the Tessera retrieval workspace.
//!
//! This crate defines the foundational types used throughout the system:
//! - `DocId`/`Document`/`ContentKind`: document identity and classification.
//! - `CorpusStats`: running corpus-wide token/document counts.
//! - `EngineConfig`: every tunable named in the retrieval core's external
//!   configuration surface.
//! - `Error`: the unified error type hierarchy.
//! - `Stats`/`QueryStats`/`CacheStats`: read-only telemetry snapshots.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod stats;

pub use config::EngineConfig;
pub use document::{ContentKind, CorpusStats, DocId, Document, KindWeights};
pub use error::{Error, Result};
pub use stats::{CacheStats, QueryStats, Stats};
