//! Bucketed frontier: a lazily-sorted priority structure over a bounded
//! distance range `[min, min + width * num_buckets)`.
//!
//! Entries are placed in a bucket by `floor((d - min) / width)`; a bucket
//! is only sorted the moment it is drained, not on every insert, which is
//! what makes `BatchPrepend` cheap relative to a plain binary heap when
//! many entries share a narrow distance range (the common case once BMSSP
//! recursion has narrowed the bound).

use tessera_core::DocId;

/// One frontier entry: a vertex and its tentative distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    /// Vertex id.
    pub id: DocId,
    /// Tentative distance from the source set.
    pub dist: f32,
}

pub struct BucketedFrontier {
    min: f32,
    width: f32,
    buckets: Vec<Vec<Entry>>,
    sorted: Vec<bool>,
    len: usize,
}

impl BucketedFrontier {
    /// Create a frontier spanning `[min, min + width * num_buckets)`.
    /// `width` must be positive.
    pub fn new(min: f32, width: f32, num_buckets: usize) -> Self {
        let num_buckets = num_buckets.max(1);
        BucketedFrontier {
            min,
            width: width.max(f32::EPSILON),
            buckets: vec![Vec::new(); num_buckets],
            sorted: vec![true; num_buckets],
            len: 0,
        }
    }

    fn bucket_index(&self, dist: f32) -> usize {
        let idx = ((dist - self.min) / self.width).floor();
        if idx < 0.0 {
            0
        } else {
            (idx as usize).min(self.buckets.len() - 1)
        }
    }

    /// Place a single entry into its bucket.
    pub fn insert(&mut self, id: DocId, dist: f32) {
        let idx = self.bucket_index(dist);
        self.buckets[idx].push(Entry { id, dist });
        self.sorted[idx] = false;
        self.len += 1;
    }

    /// Bulk-insert a slice of entries; marks each touched bucket unsorted
    /// without sorting eagerly.
    pub fn batch_prepend(&mut self, entries: &[Entry]) {
        for e in entries {
            self.insert(e.id, e.dist);
        }
    }

    /// Total entries currently held (including duplicates not yet pulled).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the frontier holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove and return up to `n` globally smallest entries, ascending
    /// by distance. Sorts the first non-empty bucket on demand, then
    /// drains buckets in order until `n` entries are collected or the
    /// frontier is exhausted.
    pub fn pull(&mut self, n: usize) -> Vec<Entry> {
        let mut out = Vec::with_capacity(n.min(self.len));
        let mut bucket_idx = 0;
        while out.len() < n && bucket_idx < self.buckets.len() {
            if self.buckets[bucket_idx].is_empty() {
                bucket_idx += 1;
                continue;
            }
            if !self.sorted[bucket_idx] {
                self.buckets[bucket_idx]
                    .sort_by(|a, b| a.dist.partial_cmp(&b.dist).unwrap_or(std::cmp::Ordering::Equal));
                self.sorted[bucket_idx] = true;
            }
            let take = (n - out.len()).min(self.buckets[bucket_idx].len());
            let drained: Vec<Entry> = self.buckets[bucket_idx].drain(0..take).collect();
            self.len -= drained.len();
            out.extend(drained);
            if self.buckets[bucket_idx].is_empty() {
                bucket_idx += 1;
            } else {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_ascending_order() {
        let mut frontier = BucketedFrontier::new(0.0, 1.0, 10);
        frontier.insert(1, 5.0);
        frontier.insert(2, 1.0);
        frontier.insert(3, 3.0);
        let pulled = frontier.pull(3);
        assert_eq!(pulled.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn test_pull_n_respects_limit() {
        let mut frontier = BucketedFrontier::new(0.0, 1.0, 10);
        for i in 0..5u32 {
            frontier.insert(i, i as f32);
        }
        let pulled = frontier.pull(2);
        assert_eq!(pulled.len(), 2);
        assert_eq!(frontier.len(), 3);
    }

    #[test]
    fn test_batch_prepend() {
        let mut frontier = BucketedFrontier::new(0.0, 1.0, 10);
        frontier.batch_prepend(&[Entry { id: 1, dist: 2.0 }, Entry { id: 2, dist: 0.5 }]);
        assert_eq!(frontier.len(), 2);
        let pulled = frontier.pull(2);
        assert_eq!(pulled[0].id, 2);
    }

    #[test]
    fn test_empty_pull() {
        let mut frontier = BucketedFrontier::new(0.0, 1.0, 4);
        assert!(frontier.pull(5).is_empty());
    }

    #[test]
    fn test_out_of_range_clamps_to_last_bucket() {
        let mut frontier = BucketedFrontier::new(0.0, 1.0, 3);
        frontier.insert(1, 100.0);
        let pulled = frontier.pull(1);
        assert_eq!(pulled[0].id, 1);
    }

    #[test]
    fn test_pull_exhausts_across_buckets() {
        let mut frontier = BucketedFrontier::new(0.0, 1.0, 3);
        for i in 0..3u32 {
            frontier.insert(i, i as f32);
        }
        let all = frontier.pull(100);
        assert_eq!(all.len(), 3);
        assert!(frontier.is_empty());
    }
}
