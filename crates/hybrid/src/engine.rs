//! Caching, stats-accumulating wrapper around [`HybridPlanner`].
//!
//! Unlike the planner, `HybridEngine` is stateful: it owns the result
//! cache and the running engine-wide `Stats`.

use std::time::Instant;

use parking_lot::Mutex;
use tessera_core::{CacheStats, DocId, EngineConfig, Result, Stats};
use tessera_graph::AdjacencyMap;
use tessera_search::LexicalIndex;
use tessera_vector::VectorIndex;
use tracing::instrument;

use crate::cache::{fingerprint, ResultCache};
use crate::fusion::RankedResult;
use crate::planner::HybridPlanner;
use crate::pool::Pool;
use crate::query::HybridQuery;

/// Wraps the stateless planner with a fingerprinted result cache and
/// engine-wide telemetry.
pub struct HybridEngine {
    cache: ResultCache,
    stats: Mutex<Stats>,
    ids_scratch: Pool<DocId>,
    default_alpha: f32,
    default_beta: f32,
    default_gamma: f32,
}

impl HybridEngine {
    /// Build an engine-level cache sized per `config`.
    pub fn new(config: &EngineConfig) -> Self {
        HybridEngine {
            cache: ResultCache::new(config.cache_capacity, config.cache_ttl),
            stats: Mutex::new(Stats::default()),
            ids_scratch: Pool::new(),
            default_alpha: config.default_alpha,
            default_beta: config.default_beta,
            default_gamma: config.default_gamma,
        }
    }

    /// Run `query`, serving from cache when a live, matching fingerprint
    /// is present; otherwise run the planner and cache the fresh result.
    #[instrument(skip(self, lexical, vector, graph, path_of))]
    pub fn search(
        &self,
        query: &HybridQuery,
        lexical: &LexicalIndex,
        vector: &VectorIndex,
        graph: &AdjacencyMap,
        path_of: impl Fn(DocId) -> String + Sync,
    ) -> Result<Vec<RankedResult>> {
        let mut query = query.clone();
        query.apply_default_weights(self.default_alpha, self.default_beta, self.default_gamma);
        let query = &query;
        query.validate()?;

        let fp = fingerprint(
            &query.text,
            query.embedding.as_deref(),
            query.seeds.as_deref(),
            query.k,
            query.hops,
            query.alpha,
            query.beta,
            query.gamma,
        );

        let start = Instant::now();
        if let Some(cached) = self.cache.get(fp) {
            self.stats.lock().record_search(start.elapsed(), true);
            return Ok(cached);
        }

        let planner = HybridPlanner::new(lexical, vector, graph, &self.ids_scratch);
        let (results, _query_stats) = planner.search(query, path_of)?;
        self.cache.insert(fp, results.clone());
        self.stats.lock().record_search(start.elapsed(), false);
        Ok(results)
    }

    /// Engine-wide running statistics.
    pub fn stats(&self) -> Stats {
        self.stats.lock().clone()
    }

    /// Result-cache hit/miss/entry snapshot.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Reset the result cache and engine-wide stats.
    pub fn clear(&self) {
        self.cache.clear();
        *self.stats.lock() = Stats::default();
    }
}
