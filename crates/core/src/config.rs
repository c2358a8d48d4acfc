//! Engine-wide configuration.
//!
//! Every key enumerated in the retrieval core's external-interface
//! configuration table lives here. There is no environment variable or file
//! parsing: configuration is constructed in-process by the caller.

use crate::document::KindWeights;
use std::time::Duration;

/// Engine-wide configuration, constructed once at `Engine::new` time.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed embedding dimensionality enforced by the ANN index.
    pub embedding_dim: usize,
    /// ANN build parameter: max neighbors per node on layers above 0.
    pub ann_m: usize,
    /// ANN build parameter: candidate list size during construction.
    pub ann_ef_construction: usize,
    /// Default ANN search parameter: dynamic candidate list size.
    pub ann_ef_search: usize,
    /// BM25 term-frequency saturation parameter.
    pub bm25_k1: f32,
    /// BM25 length-normalization parameter.
    pub bm25_b: f32,
    /// Per-content-kind BM25 score multipliers.
    pub kind_weights: KindWeights,
    /// Maximum number of entries retained in the result cache before an
    /// eviction sweep runs.
    pub cache_capacity: usize,
    /// Time-to-live of a cached query result.
    pub cache_ttl: Duration,
    /// Default lexical weight (alpha) when a query omits one.
    pub default_alpha: f32,
    /// Default semantic weight (beta) when a query omits one.
    pub default_beta: f32,
    /// Default graph weight (gamma) when a query omits one.
    pub default_gamma: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            embedding_dim: 384,
            ann_m: 16,
            ann_ef_construction: 200,
            ann_ef_search: 50,
            bm25_k1: 1.2,
            bm25_b: 0.75,
            kind_weights: KindWeights::default(),
            cache_capacity: 100,
            cache_ttl: Duration::from_secs(300),
            default_alpha: 0.5,
            default_beta: 0.3,
            default_gamma: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_spec_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.ann_m, 16);
        assert!((cfg.bm25_k1 - 1.2).abs() < f32::EPSILON);
        assert!((cfg.bm25_b - 0.75).abs() < f32::EPSILON);
        assert_eq!(cfg.cache_capacity, 100);
        assert_eq!(cfg.cache_ttl, Duration::from_secs(300));
    }
}
