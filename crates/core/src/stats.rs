//! Engine-wide and per-query telemetry snapshots.
//!
//! These types are read-only views handed back to callers; nothing here is
//! mutated through `&self`. The engine accumulates the underlying counters
//! and timings internally and materializes a snapshot on demand.

use std::time::Duration;

/// Per-query component timings and counts, returned alongside a search's
/// ranked results when the caller asks for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    /// Wall time spent in the lexical (BM25) sub-search.
    pub lexical_time: Duration,
    /// Wall time spent in the semantic (ANN) sub-search.
    pub semantic_time: Duration,
    /// Wall time spent in the graph (BMSSP) sub-search.
    pub graph_time: Duration,
    /// Wall time spent fusing and ranking.
    pub fusion_time: Duration,
    /// Candidates returned by the lexical sub-search.
    pub lexical_candidates: usize,
    /// Candidates returned by the semantic sub-search.
    pub semantic_candidates: usize,
    /// Candidates returned by the graph sub-search.
    pub graph_candidates: usize,
    /// Number of documents in the final fused, top-k result.
    pub combined_count: usize,
    /// Of the final top-k, how many received a nonzero lexical contribution.
    pub lexical_contributions: usize,
    /// Of the final top-k, how many received a nonzero semantic contribution.
    pub semantic_contributions: usize,
    /// Of the final top-k, how many received a nonzero graph contribution.
    pub graph_contributions: usize,
    /// Whether this query was served from the result cache.
    pub cache_hit: bool,
}

/// Engine-wide running statistics, accumulated across all queries.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Total number of `search` calls served.
    pub total_searches: u64,
    /// Running mean response time across all searches.
    pub mean_response_time: Duration,
    /// Cumulative cache hits.
    pub cache_hits: u64,
    /// Cumulative cache misses.
    pub cache_misses: u64,
}

impl Stats {
    /// Fold one more query's total latency into the running mean.
    pub fn record_search(&mut self, latency: Duration, cache_hit: bool) {
        let n = self.total_searches;
        let new_n = n + 1;
        let prev_mean_nanos = self.mean_response_time.as_nanos() as f64;
        let latency_nanos = latency.as_nanos() as f64;
        let new_mean_nanos = prev_mean_nanos + (latency_nanos - prev_mean_nanos) / new_n as f64;
        self.mean_response_time = Duration::from_nanos(new_mean_nanos.round() as u64);
        self.total_searches = new_n;
        if cache_hit {
            self.cache_hits += 1;
        } else {
            self.cache_misses += 1;
        }
    }
}

/// Read-only snapshot of the result cache's current state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Total cache hits since engine creation.
    pub hits: u64,
    /// Total cache misses since engine creation.
    pub misses: u64,
    /// Number of entries currently resident in the cache.
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups that were hits, in `[0, 1]`. Zero when there have
    /// been no lookups yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_running_mean() {
        let mut stats = Stats::default();
        stats.record_search(Duration::from_millis(10), false);
        stats.record_search(Duration::from_millis(20), false);
        assert_eq!(stats.total_searches, 2);
        // mean of 10ms and 20ms is 15ms
        let mean_ms = stats.mean_response_time.as_millis();
        assert!((14..=16).contains(&mean_ms));
        assert_eq!(stats.cache_misses, 2);
    }

    #[test]
    fn test_stats_cache_counters() {
        let mut stats = Stats::default();
        stats.record_search(Duration::from_millis(1), true);
        stats.record_search(Duration::from_millis(1), false);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
    }

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            entries: 4,
        };
        assert!((stats.hit_rate() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_cache_stats_hit_rate_empty() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
