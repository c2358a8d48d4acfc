//! Result cache: fingerprinted, TTL'd, access-counted.
//!
//! Entries are immutable once inserted — a hit clones and returns, it
//! never mutates the stored result list. Eviction is the only operation
//! that removes entries, and runs as a single sweep rather than per-read
//! bookkeeping.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tessera_core::{CacheStats, DocId};

use crate::fusion::RankedResult;

/// Deterministic hash over a query's cacheable inputs.
pub type Fingerprint = u64;

/// Compute the fingerprint for a query: hashes `text`, the embedding's
/// raw bytes (if any), the seed ids (if any), `k`, `hops`, and the three
/// fusion weights.
#[allow(clippy::too_many_arguments)]
pub fn fingerprint(
    text: &str,
    embedding: Option<&[f32]>,
    seeds: Option<&[DocId]>,
    k: usize,
    hops: u32,
    alpha: f32,
    beta: f32,
    gamma: f32,
) -> Fingerprint {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    if let Some(embedding) = embedding {
        for f in embedding {
            f.to_bits().hash(&mut hasher);
        }
    }
    if let Some(seeds) = seeds {
        seeds.hash(&mut hasher);
    }
    k.hash(&mut hasher);
    hops.hash(&mut hasher);
    alpha.to_bits().hash(&mut hasher);
    beta.to_bits().hash(&mut hasher);
    gamma.to_bits().hash(&mut hasher);
    hasher.finish()
}

struct Entry {
    results: Vec<RankedResult>,
    inserted_at: Instant,
    ttl: Duration,
    access_count: u64,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at) > self.ttl
    }
}

/// Concurrent, TTL'd, access-counted cache of fused query results.
pub struct ResultCache {
    entries: DashMap<Fingerprint, Entry>,
    capacity: usize,
    default_ttl: Duration,
    hits: std::sync::atomic::AtomicU64,
    misses: std::sync::atomic::AtomicU64,
}

impl ResultCache {
    /// Create a cache with the given eviction-trigger capacity and
    /// default entry TTL.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        ResultCache {
            entries: DashMap::new(),
            capacity,
            default_ttl,
            hits: std::sync::atomic::AtomicU64::new(0),
            misses: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Look up a fingerprint. On a live hit, bumps `access_count` and
    /// returns a clone of the stored results; an expired entry counts as
    /// a miss and is left for the next eviction sweep to reclaim.
    pub fn get(&self, fp: Fingerprint) -> Option<Vec<RankedResult>> {
        use std::sync::atomic::Ordering;
        let now = Instant::now();
        if let Some(mut entry) = self.entries.get_mut(&fp) {
            if !entry.is_expired(now) {
                entry.access_count += 1;
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.results.clone());
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Insert a fresh result list under `fp`, then run an eviction sweep
    /// if the cache now exceeds capacity.
    pub fn insert(&self, fp: Fingerprint, results: Vec<RankedResult>) {
        self.entries.insert(
            fp,
            Entry {
                results,
                inserted_at: Instant::now(),
                ttl: self.default_ttl,
                access_count: 0,
            },
        );
        if self.entries.len() > self.capacity {
            self.evict();
        }
    }

    /// Remove every expired entry, plus every entry with `access_count < 2`,
    /// in one sweep.
    pub fn evict(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| !entry.is_expired(now) && entry.access_count >= 2);
    }

    /// Current entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Read-only snapshot of hit/miss/entry counters.
    pub fn stats(&self) -> CacheStats {
        use std::sync::atomic::Ordering;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
