//! Hierarchical Navigable Small World index.
//!
//! A multi-layer proximity graph: layer 0 holds every node with up to `2M`
//! neighbors, higher layers hold a geometrically-shrinking subset with up
//! to `M` neighbors each. Search descends greedily from the top layer to
//! layer 1, then runs a best-first beam search at layer 0 with dynamic
//! candidate-list size `ef`.
//!
//! Node levels and tie-breaks are fully deterministic: level assignment
//! uses a fixed-seed splitmix64 stream driven by a monotonic counter, and
//! every sort breaks ties by ascending document id. Two identical insert
//! sequences produce identical graphs.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use tessera_core::DocId;

use crate::distance::cosine_similarity;
use crate::heap::VectorHeap;

/// Tunables for graph construction and search.
#[derive(Debug, Clone)]
pub struct HnswConfig {
    /// Max neighbors per node on layers above 0 (default 16).
    pub m: usize,
    /// Candidate-list size used while building the graph (default 200).
    pub ef_construction: usize,
    /// Default candidate-list size used at search time (default 50).
    pub ef_search: usize,
    /// When true, every node is inserted at layer 0 only, with the
    /// layer-0 neighbor cap, and search is a bounded scan rather than
    /// layered descent. Trades recall for lower latency.
    pub fast_construction: bool,
}

impl Default for HnswConfig {
    fn default() -> Self {
        HnswConfig {
            m: 16,
            ef_construction: 200,
            ef_search: 50,
            fast_construction: false,
        }
    }
}

impl HnswConfig {
    fn max_connections_layer0(&self) -> usize {
        self.m * 2
    }

    fn max_connections(&self) -> usize {
        self.m
    }

    /// Level multiplier `1 / ln(2)`, the mean of the geometric
    /// distribution levels are drawn from.
    fn level_multiplier(&self) -> f64 {
        1.0 / std::f64::consts::LN_2
    }
}

#[derive(Debug, Clone)]
struct HnswNode {
    neighbors: Vec<BTreeSet<DocId>>,
    max_layer: usize,
}

impl HnswNode {
    fn new(max_layer: usize) -> Self {
        HnswNode {
            neighbors: (0..=max_layer).map(|_| BTreeSet::new()).collect(),
            max_layer,
        }
    }
}

/// Similarity-ranked candidate. Natural ordering puts the highest score
/// (and, on ties, the lowest id) as `Greater`, so a plain `BinaryHeap`
/// acts as a max-heap by score with deterministic tie-breaking.
#[derive(Debug, Clone, PartialEq)]
struct ScoredId {
    score: f32,
    id: DocId,
}

impl Eq for ScoredId {}

impl PartialOrd for ScoredId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// A single ranked neighbor returned by `search`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Matching document id.
    pub id: DocId,
    /// Cosine similarity to the query vector, in `[-1, 1]`.
    pub similarity: f32,
}

/// The HNSW graph proper: neighbor links only, no embedding ownership —
/// embeddings live in a [`VectorHeap`] passed to every method that needs
/// distance computation.
pub struct HnswGraph {
    config: HnswConfig,
    nodes: BTreeMap<DocId, HnswNode>,
    entry_point: Option<DocId>,
    max_level: usize,
    rng_seed: u64,
    rng_counter: u64,
}

impl HnswGraph {
    /// Create an empty graph with the given configuration.
    pub fn new(config: HnswConfig) -> Self {
        HnswGraph {
            config,
            nodes: BTreeMap::new(),
            entry_point: None,
            max_level: 0,
            rng_seed: 0x5eed_c0de_u64,
            rng_counter: 0,
        }
    }

    /// Number of nodes currently in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Discard all nodes and reset entry point / level counters.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entry_point = None;
        self.max_level = 0;
        self.rng_counter = 0;
    }

    fn splitmix64(seed: u64) -> u64 {
        let mut x = seed;
        x = x.wrapping_add(0x9e3779b97f4a7c15);
        x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }

    fn assign_level(&mut self) -> usize {
        if self.config.fast_construction {
            return 0;
        }
        self.rng_counter += 1;
        let hash = Self::splitmix64(self.rng_seed.wrapping_add(self.rng_counter));
        let uniform = ((hash as f64) / (u64::MAX as f64)).max(1e-15);
        (-uniform.ln() * self.config.level_multiplier()) as usize
    }

    /// Insert `id`'s embedding (already present in `heap`) into the graph.
    pub fn insert(&mut self, id: DocId, heap: &VectorHeap) {
        let level = self.assign_level();
        self.nodes.insert(id, HnswNode::new(level));

        let Some(entry_id) = self.entry_point else {
            self.entry_point = Some(id);
            self.max_level = level;
            return;
        };

        let embedding = match heap.get(id) {
            Some(e) => e,
            None => return,
        };

        let mut current_entry = entry_id;
        if self.max_level > level {
            current_entry =
                self.greedy_search_to_layer(embedding, entry_id, self.max_level, level + 1, heap);
        }

        let start_layer = level.min(self.max_level);
        for layer in (0..=start_layer).rev() {
            let candidates =
                self.search_layer(embedding, current_entry, self.config.ef_construction, layer, heap);
            let max_conn = if layer == 0 {
                self.config.max_connections_layer0()
            } else {
                self.config.max_connections()
            };

            let selected = Self::select_neighbors(&candidates, max_conn);
            if let Some(node) = self.nodes.get_mut(&id) {
                if layer < node.neighbors.len() {
                    node.neighbors[layer] = selected.iter().copied().collect();
                }
            }
            for &neighbor_id in &selected {
                if let Some(node) = self.nodes.get_mut(&neighbor_id) {
                    if layer < node.neighbors.len() {
                        node.neighbors[layer].insert(id);
                    }
                }
                self.prune_neighbors(neighbor_id, layer, max_conn, heap);
            }
            if !candidates.is_empty() {
                current_entry = candidates[0].id;
            }
        }

        if level > self.max_level {
            self.max_level = level;
            self.entry_point = Some(id);
        }
    }

    fn greedy_search_to_layer(
        &self,
        query: &[f32],
        entry_id: DocId,
        from_layer: usize,
        to_layer: usize,
        heap: &VectorHeap,
    ) -> DocId {
        let mut current = entry_id;
        for layer in (to_layer..=from_layer).rev() {
            let mut improved = true;
            while improved {
                improved = false;
                let Some(current_embedding) = heap.get(current) else {
                    break;
                };
                let mut best_score = cosine_similarity(query, current_embedding);
                let mut best_id = current;

                if let Some(node) = self.nodes.get(&current) {
                    if layer < node.neighbors.len() {
                        for &neighbor_id in &node.neighbors[layer] {
                            if let Some(neighbor_embedding) = heap.get(neighbor_id) {
                                let score = cosine_similarity(query, neighbor_embedding);
                                if score > best_score
                                    || (score == best_score && neighbor_id < best_id)
                                {
                                    best_score = score;
                                    best_id = neighbor_id;
                                }
                            }
                        }
                    }
                }

                if best_id != current {
                    current = best_id;
                    improved = true;
                }
            }
        }
        current
    }

    fn search_layer(
        &self,
        query: &[f32],
        entry_id: DocId,
        ef: usize,
        layer: usize,
        heap: &VectorHeap,
    ) -> Vec<ScoredId> {
        let Some(entry_embedding) = heap.get(entry_id) else {
            return Vec::new();
        };
        let entry_score = cosine_similarity(query, entry_embedding);

        let mut visited = BTreeSet::new();
        visited.insert(entry_id);

        let mut candidates = BinaryHeap::new();
        candidates.push(ScoredId {
            score: entry_score,
            id: entry_id,
        });

        let mut results: BinaryHeap<Reverse<ScoredId>> = BinaryHeap::new();
        results.push(Reverse(ScoredId {
            score: entry_score,
            id: entry_id,
        }));

        while let Some(nearest) = candidates.pop() {
            let worst = results.peek().map(|r| r.0.score).unwrap_or(f32::NEG_INFINITY);
            if nearest.score < worst && results.len() >= ef {
                break;
            }

            if let Some(node) = self.nodes.get(&nearest.id) {
                if layer < node.neighbors.len() {
                    for &neighbor_id in &node.neighbors[layer] {
                        if visited.contains(&neighbor_id) {
                            continue;
                        }
                        visited.insert(neighbor_id);

                        if let Some(neighbor_embedding) = heap.get(neighbor_id) {
                            let score = cosine_similarity(query, neighbor_embedding);
                            let worst =
                                results.peek().map(|r| r.0.score).unwrap_or(f32::NEG_INFINITY);
                            if results.len() < ef || score > worst {
                                candidates.push(ScoredId {
                                    score,
                                    id: neighbor_id,
                                });
                                results.push(Reverse(ScoredId {
                                    score,
                                    id: neighbor_id,
                                }));
                                if results.len() > ef {
                                    results.pop();
                                }
                            }
                        }
                    }
                }
            }
        }

        let mut out: Vec<ScoredId> = results.into_iter().map(|r| r.0).collect();
        out.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        out
    }

    fn select_neighbors(candidates: &[ScoredId], max_connections: usize) -> Vec<DocId> {
        candidates.iter().take(max_connections).map(|s| s.id).collect()
    }

    fn prune_neighbors(&mut self, id: DocId, layer: usize, max_connections: usize, heap: &VectorHeap) {
        let Some(embedding) = heap.get(id).map(|e| e.to_vec()) else {
            return;
        };
        let neighbors: Vec<DocId> = match self.nodes.get(&id) {
            Some(node) if layer < node.neighbors.len() => {
                node.neighbors[layer].iter().copied().collect()
            }
            _ => return,
        };
        if neighbors.len() <= max_connections {
            return;
        }

        let mut scored: Vec<ScoredId> = neighbors
            .iter()
            .filter_map(|&nid| {
                heap.get(nid).map(|n_emb| ScoredId {
                    score: cosine_similarity(&embedding, n_emb),
                    id: nid,
                })
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        let keep: BTreeSet<DocId> = scored.iter().take(max_connections).map(|s| s.id).collect();
        if let Some(node) = self.nodes.get_mut(&id) {
            if layer < node.neighbors.len() {
                node.neighbors[layer] = keep;
            }
        }
    }

    /// Bounded scan fallback used by fast-construction mode: score every
    /// node directly against the query and keep the top `k`.
    fn bounded_scan(&self, query: &[f32], k: usize, heap: &VectorHeap) -> Vec<Neighbor> {
        let mut scored: Vec<ScoredId> = self
            .nodes
            .keys()
            .filter_map(|&id| {
                heap.get(id).map(|e| ScoredId {
                    score: cosine_similarity(query, e),
                    id,
                })
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        scored
            .into_iter()
            .take(k)
            .map(|s| Neighbor {
                id: s.id,
                similarity: s.score,
            })
            .collect()
    }

    /// Rank up to `k` nearest neighbors to `query`, descending by
    /// similarity, ties broken by ascending id. `ef` controls the
    /// layer-0 candidate-list size (ignored in fast-construction mode).
    pub fn search(&self, query: &[f32], k: usize, ef: usize, heap: &VectorHeap) -> Vec<Neighbor> {
        let Some(entry_id) = self.entry_point else {
            return Vec::new();
        };

        if self.config.fast_construction {
            return self.bounded_scan(query, k, heap);
        }

        let mut current_entry = self.greedy_search_to_layer(query, entry_id, self.max_level, 1, heap);
        if self.max_level == 0 {
            current_entry = entry_id;
        }

        let ef_used = ef.max(k);
        let candidates = self.search_layer(query, current_entry, ef_used, 0, heap);
        candidates
            .into_iter()
            .take(k)
            .map(|s| Neighbor {
                id: s.id,
                similarity: s.score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(n: usize, dim: usize, fast: bool) -> (HnswGraph, VectorHeap) {
        let config = HnswConfig {
            fast_construction: fast,
            ..HnswConfig::default()
        };
        let mut graph = HnswGraph::new(config);
        let mut heap = VectorHeap::new(dim);
        for i in 0..n as u32 {
            let v: Vec<f32> = (0..dim).map(|d| ((i as usize + d) % 7) as f32).collect();
            heap.insert(i, v);
            graph.insert(i, &heap);
        }
        (graph, heap)
    }

    #[test]
    fn test_empty_graph_search() {
        let heap = VectorHeap::new(4);
        let graph = HnswGraph::new(HnswConfig::default());
        assert!(graph.search(&[0.0; 4], 5, 50, &heap).is_empty());
    }

    #[test]
    fn test_exact_match_high_similarity() {
        let (graph, heap) = build(200, 16, false);
        let query = heap.get(42).unwrap().to_vec();
        let results = graph.search(&query, 1, 50, &heap);
        assert_eq!(results[0].id, 42);
        assert!(results[0].similarity >= 0.999);
    }

    #[test]
    fn test_similarity_in_bounds() {
        let (graph, heap) = build(100, 8, false);
        let query = vec![1.0; 8];
        for r in graph.search(&query, 10, 50, &heap) {
            assert!((-1.0..=1.0).contains(&r.similarity));
        }
    }

    #[test]
    fn test_respects_k() {
        let (graph, heap) = build(50, 8, false);
        let query = vec![3.0; 8];
        let results = graph.search(&query, 5, 50, &heap);
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_descending_similarity_order() {
        let (graph, heap) = build(50, 8, false);
        let query = vec![2.0; 8];
        let results = graph.search(&query, 10, 50, &heap);
        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_fast_construction_mode_exact_match() {
        let (graph, heap) = build(100, 8, true);
        let query = heap.get(7).unwrap().to_vec();
        let results = graph.search(&query, 1, 50, &heap);
        assert_eq!(results[0].id, 7);
        assert!(results[0].similarity >= 0.999);
    }

    #[test]
    fn test_deterministic_across_rebuilds() {
        let (graph_a, heap_a) = build(60, 8, false);
        let (graph_b, heap_b) = build(60, 8, false);
        let query = vec![1.5; 8];
        let a = graph_a.search(&query, 5, 50, &heap_a);
        let b = graph_b.search(&query, 5, 50, &heap_b);
        assert_eq!(
            a.iter().map(|n| n.id).collect::<Vec<_>>(),
            b.iter().map(|n| n.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_clear_resets_graph() {
        let (mut graph, heap) = build(10, 4, false);
        graph.clear();
        assert!(graph.is_empty());
        assert!(graph.search(&[1.0; 4], 5, 50, &heap).is_empty());
    }
}
