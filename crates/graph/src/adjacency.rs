//! Adjacency map: the graph's edge storage.

use rustc_hash::FxHashMap;
use tessera_core::DocId;

use crate::error::{GraphError, Result};

/// Directed, weighted adjacency map. Self-loops and parallel edges are
/// both permitted; callers decide what that means for their domain.
#[derive(Debug, Default)]
pub struct AdjacencyMap {
    edges: FxHashMap<DocId, Vec<(DocId, f32)>>,
    node_count: usize,
    edge_count: usize,
}

impl AdjacencyMap {
    /// Create an empty adjacency map.
    pub fn new() -> Self {
        AdjacencyMap::default()
    }

    /// Add a directed edge `from -> to` with a finite, non-negative `weight`.
    pub fn add_edge(&mut self, from: DocId, to: DocId, weight: f32) -> Result<()> {
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight(weight));
        }
        if weight < 0.0 {
            return Err(GraphError::NegativeWeight(weight));
        }
        self.touch_node(from);
        self.touch_node(to);
        self.edges.entry(from).or_default().push((to, weight));
        self.edge_count += 1;
        Ok(())
    }

    fn touch_node(&mut self, id: DocId) {
        if !self.edges.contains_key(&id) {
            self.edges.insert(id, Vec::new());
            self.node_count += 1;
        }
    }

    /// Outgoing edges from `id`, empty if `id` has none or isn't present.
    pub fn neighbors(&self, id: DocId) -> &[(DocId, f32)] {
        self.edges.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Total distinct nodes that have appeared as an edge endpoint.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Total directed edges added.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Discard all edges.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.node_count = 0;
        self.edge_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_and_neighbors() {
        let mut adj = AdjacencyMap::new();
        adj.add_edge(0, 1, 1.0).unwrap();
        adj.add_edge(0, 2, 2.0).unwrap();
        assert_eq!(adj.neighbors(0), &[(1, 1.0), (2, 2.0)]);
        assert_eq!(adj.neighbors(1), &[]);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut adj = AdjacencyMap::new();
        assert_eq!(adj.add_edge(0, 1, -1.0), Err(GraphError::NegativeWeight(-1.0)));
    }

    #[test]
    fn test_nan_weight_rejected() {
        let mut adj = AdjacencyMap::new();
        let err = adj.add_edge(0, 1, f32::NAN).unwrap_err();
        assert!(matches!(err, GraphError::NonFiniteWeight(w) if w.is_nan()));
    }

    #[test]
    fn test_infinite_weight_rejected() {
        let mut adj = AdjacencyMap::new();
        assert_eq!(
            adj.add_edge(0, 1, f32::INFINITY),
            Err(GraphError::NonFiniteWeight(f32::INFINITY))
        );
        assert_eq!(
            adj.add_edge(0, 1, f32::NEG_INFINITY),
            Err(GraphError::NonFiniteWeight(f32::NEG_INFINITY))
        );
    }

    #[test]
    fn test_node_and_edge_counts() {
        let mut adj = AdjacencyMap::new();
        adj.add_edge(0, 1, 1.0).unwrap();
        adj.add_edge(1, 2, 1.0).unwrap();
        assert_eq!(adj.node_count(), 3);
        assert_eq!(adj.edge_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut adj = AdjacencyMap::new();
        adj.add_edge(0, 1, 1.0).unwrap();
        adj.clear();
        assert_eq!(adj.node_count(), 0);
        assert_eq!(adj.edge_count(), 0);
    }
}
