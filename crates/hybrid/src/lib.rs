//! Hybrid planner: query routing, weighted fusion, the result cache, and
//! the per-query scratch pool.
//!
//! - `query`: `HybridQuery` and its routing rules.
//! - `planner`: stateless sub-search orchestration and fusion.
//! - `fusion`: score normalization, weighted fusion, `RankedResult`.
//! - `cache`: the fingerprinted, TTL'd result cache.
//! - `engine`: the stateful cache + stats wrapper around the planner.
//! - `pool`: per-query scratch buffer pool.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod engine;
pub mod fusion;
pub mod planner;
pub mod pool;
pub mod query;

pub use cache::{fingerprint, Fingerprint, ResultCache};
pub use engine::HybridEngine;
pub use fusion::{fuse, RankedResult};
pub use planner::HybridPlanner;
pub use pool::{Pool, PoolGuard};
pub use query::{HybridQuery, RoutingPreference};
