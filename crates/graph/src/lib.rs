//! Graph (BMSSP) retrieval signal.
//!
//! - `adjacency`: the directed weighted adjacency map.
//! - `bucket`: the bucketed frontier priority structure.
//! - `sssp`: bounded multi-source shortest paths.
//! - `error`: `GraphError`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adjacency;
pub mod bucket;
pub mod error;
pub mod sssp;

pub use adjacency::AdjacencyMap;
pub use bucket::{BucketedFrontier, Entry};
pub use error::{GraphError, Result};
pub use sssp::{should_use_bmssp, sssp, sssp_bounded_hops, sssp_multi, SsspResult, PIVOT_BFS_CAP};
