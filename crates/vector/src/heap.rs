//! Embedding storage backing the HNSW graph.
//!
//! The graph structure (`HnswGraph`) stores only ids and neighbor links;
//! the actual float data lives here, indexed by id in a dense,
//! deterministically-ordered map.

use std::collections::BTreeMap;
use tessera_core::DocId;

/// Owns the embedding for every indexed vector.
#[derive(Debug, Default)]
pub struct VectorHeap {
    dim: usize,
    vectors: BTreeMap<DocId, Vec<f32>>,
}

impl VectorHeap {
    /// Create a heap fixed to `dim`-dimensional vectors.
    pub fn new(dim: usize) -> Self {
        VectorHeap {
            dim,
            vectors: BTreeMap::new(),
        }
    }

    /// Configured dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Insert or overwrite the embedding for `id`. Caller is responsible
    /// for having already validated `vec.len() == self.dim()`.
    pub fn insert(&mut self, id: DocId, vec: Vec<f32>) {
        self.vectors.insert(id, vec);
    }

    /// Borrow the embedding for `id`, if present.
    pub fn get(&self, id: DocId) -> Option<&[f32]> {
        self.vectors.get(&id).map(|v| v.as_slice())
    }

    /// Whether an embedding is already stored for `id`.
    pub fn contains(&self, id: DocId) -> bool {
        self.vectors.contains_key(&id)
    }

    /// Number of embeddings stored.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the heap holds no embeddings.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.vectors.keys().copied()
    }

    /// Remove all stored embeddings.
    pub fn clear(&mut self) {
        self.vectors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut heap = VectorHeap::new(3);
        heap.insert(1, vec![1.0, 2.0, 3.0]);
        assert_eq!(heap.get(1), Some([1.0, 2.0, 3.0].as_slice()));
        assert_eq!(heap.get(2), None);
    }

    #[test]
    fn test_ids_ascending() {
        let mut heap = VectorHeap::new(1);
        heap.insert(5, vec![0.0]);
        heap.insert(1, vec![0.0]);
        heap.insert(3, vec![0.0]);
        let ids: Vec<DocId> = heap.ids().collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_clear() {
        let mut heap = VectorHeap::new(2);
        heap.insert(1, vec![0.0, 0.0]);
        heap.clear();
        assert!(heap.is_empty());
    }
}
