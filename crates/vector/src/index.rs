//! Public vector-index contract: dimension-checked `add`/`search` over an
//! [`HnswGraph`].

use parking_lot::RwLock;
use tessera_core::DocId;
use tracing::instrument;

use crate::error::{Result, VectorError};
use crate::heap::VectorHeap;
use crate::hnsw::{HnswConfig, HnswGraph, Neighbor};

/// An ANN vector index fixed to a single embedding dimensionality.
pub struct VectorIndex {
    dim: usize,
    ef_search: usize,
    graph: RwLock<HnswGraph>,
    heap: RwLock<VectorHeap>,
}

impl VectorIndex {
    /// Create an index for `dim`-dimensional vectors.
    pub fn new(dim: usize, config: HnswConfig, ef_search: usize) -> Self {
        VectorIndex {
            dim,
            ef_search,
            graph: RwLock::new(HnswGraph::new(config)),
            heap: RwLock::new(VectorHeap::new(dim)),
        }
    }

    /// Configured dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of vectors currently indexed.
    pub fn len(&self) -> usize {
        self.heap.read().len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.heap.read().is_empty()
    }

    /// Index `vec` under `id`. Errs on dimension mismatch.
    #[instrument(skip(self, vec), fields(id, dim = self.dim))]
    pub fn add(&self, id: DocId, vec: Vec<f32>) -> Result<()> {
        if vec.len() != self.dim {
            return Err(VectorError::DimensionMismatch {
                expected: self.dim,
                actual: vec.len(),
            });
        }
        let mut heap = self.heap.write();
        if heap.contains(id) {
            return Err(VectorError::DuplicateId(id));
        }
        let mut graph = self.graph.write();
        heap.insert(id, vec);
        graph.insert(id, &heap);
        Ok(())
    }

    /// Rank up to `k` nearest neighbors to `query`, using `ef` as the
    /// layer-0 candidate-list size (falls back to the index's configured
    /// `ef_search` if `ef` is 0).
    #[instrument(skip(self, query), fields(k, dim = self.dim))]
    pub fn search(&self, query: &[f32], k: usize, ef: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dim {
            return Err(VectorError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }
        let ef = if ef == 0 { self.ef_search } else { ef };
        let heap = self.heap.read();
        let graph = self.graph.read();
        Ok(graph.search(query, k, ef, &heap))
    }

    /// Discard every indexed vector.
    pub fn clear(&self) {
        self.heap.write().clear();
        self.graph.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx() -> VectorIndex {
        VectorIndex::new(4, HnswConfig::default(), 50)
    }

    #[test]
    fn test_dimension_mismatch_on_add() {
        let index = idx();
        let err = index.add(1, vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            VectorError::DimensionMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_dimension_mismatch_on_search() {
        let index = idx();
        index.add(1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let err = index.search(&[1.0, 2.0], 1, 10).unwrap_err();
        assert_eq!(
            err,
            VectorError::DimensionMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_add_and_search_round_trip() {
        let index = idx();
        index.add(1, vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        index.add(2, vec![0.0, 1.0, 0.0, 0.0]).unwrap();
        let results = index.search(&[1.0, 0.0, 0.0, 0.0], 1, 10).unwrap();
        assert_eq!(results[0].id, 1);
    }

    #[test]
    fn test_clear() {
        let index = idx();
        index.add(1, vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        index.clear();
        assert!(index.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let index = idx();
        index.add(1, vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        let err = index.add(1, vec![0.0, 1.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(err, VectorError::DuplicateId(1));
        // The original vector must survive the rejected overwrite attempt.
        let results = index.search(&[1.0, 0.0, 0.0, 0.0], 1, 10).unwrap();
        assert_eq!(results[0].id, 1);
    }

    #[test]
    fn test_ef_zero_falls_back_to_configured() {
        let index = VectorIndex::new(4, HnswConfig::default(), 7);
        index.add(1, vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        // ef=0 should not panic and should still return results.
        let results = index.search(&[1.0, 0.0, 0.0, 0.0], 1, 0).unwrap();
        assert_eq!(results.len(), 1);
    }
}
