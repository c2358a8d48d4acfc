//! Stateless sub-search orchestration: decides which signals to run,
//! dispatches them concurrently where possible, and fuses the results.
//!
//! `HybridPlanner` holds only borrowed references to the three indexes —
//! it carries no state of its own between calls, matching the "composite
//! orchestrates, doesn't own" shape of comparable retrieval engines.

use std::time::Instant;

use tessera_core::{DocId, QueryStats, Result};
use tessera_graph::{sssp_bounded_hops, AdjacencyMap, SsspResult};
use tessera_search::LexicalIndex;
use tessera_vector::VectorIndex;

use crate::fusion::{fuse, RankedResult};
use crate::pool::Pool;
use crate::query::HybridQuery;

/// Orchestrates the three sub-searches named by a [`HybridQuery`] and
/// fuses their candidates into a ranked list.
pub struct HybridPlanner<'a> {
    lexical: &'a LexicalIndex,
    vector: &'a VectorIndex,
    graph: &'a AdjacencyMap,
    ids_scratch: &'a Pool<DocId>,
}

impl<'a> HybridPlanner<'a> {
    /// Borrow the three indexes, and a scratch-buffer pool shared across
    /// calls, for the lifetime of searches run through this planner.
    pub fn new(
        lexical: &'a LexicalIndex,
        vector: &'a VectorIndex,
        graph: &'a AdjacencyMap,
        ids_scratch: &'a Pool<DocId>,
    ) -> Self {
        HybridPlanner {
            lexical,
            vector,
            graph,
            ids_scratch,
        }
    }

    /// Run `query` against the three indexes and return a fused, ranked
    /// top-k along with per-query component stats. `path_of` resolves a
    /// document id to its source path for the returned results.
    pub fn search(
        &self,
        query: &HybridQuery,
        path_of: impl Fn(DocId) -> String + Sync,
    ) -> Result<(Vec<RankedResult>, QueryStats)> {
        let mut ids_scratch = self.ids_scratch.checkout();
        query.validate()?;

        let run_lexical = query.wants_lexical();
        let run_semantic = query.wants_semantic();
        let run_graph = query.wants_graph();

        let lexical_job = || -> (Vec<tessera_search::LexResult>, std::time::Duration) {
            if !run_lexical {
                return (Vec::new(), std::time::Duration::ZERO);
            }
            let start = Instant::now();
            // Lexical over-fetches 2k candidates to improve fusion recall.
            let results = self.lexical.search(&query.text, query.k * 2);
            (results, start.elapsed())
        };

        let semantic_job = || -> (Vec<tessera_vector::Neighbor>, std::time::Duration) {
            if !run_semantic {
                return (Vec::new(), std::time::Duration::ZERO);
            }
            let start = Instant::now();
            let embedding = query.embedding.as_deref().unwrap_or(&[]);
            let results = self
                .vector
                .search(embedding, query.k, 0)
                .unwrap_or_default();
            (results, start.elapsed())
        };

        let graph_job = || -> (Option<SsspResult>, std::time::Duration) {
            if !run_graph {
                return (None, std::time::Duration::ZERO);
            }
            let start = Instant::now();
            let seeds = query.seeds.as_deref().unwrap_or(&[]);
            let merged = merge_seed_results(self.graph, seeds, query.hops);
            (Some(merged), start.elapsed())
        };

        let (lexical_out, (semantic_out, graph_out)) =
            rayon::join(lexical_job, || rayon::join(semantic_job, graph_job));

        let (lexical_results, lexical_time) = lexical_out;
        let (semantic_results, semantic_time) = semantic_out;
        let (graph_result, graph_time) = graph_out;

        let fusion_start = Instant::now();
        let fused = fuse(
            &lexical_results,
            &semantic_results,
            graph_result.as_ref(),
            query.alpha,
            query.beta,
            query.gamma,
            query.k,
            path_of,
            &mut ids_scratch,
        );
        let fusion_time = fusion_start.elapsed();

        let stats = QueryStats {
            lexical_time,
            semantic_time,
            graph_time,
            fusion_time,
            lexical_candidates: lexical_results.len(),
            semantic_candidates: semantic_results.len(),
            graph_candidates: graph_result.map(|r| r.distances.len()).unwrap_or(0),
            combined_count: fused.len(),
            lexical_contributions: fused.iter().filter(|r| r.bm25 > 0.0).count(),
            semantic_contributions: fused.iter().filter(|r| r.semantic > 0.0).count(),
            graph_contributions: fused.iter().filter(|r| r.graph > 0.0).count(),
            cache_hit: false,
        };

        Ok((fused, stats))
    }
}

/// Run the hop-bounded search from each seed and merge into a single
/// result, keeping the minimum distance (and its predecessor) per vertex.
fn merge_seed_results(graph: &AdjacencyMap, seeds: &[DocId], hops: u32) -> SsspResult {
    let mut merged = SsspResult::default();
    for &seed in seeds {
        let Ok(partial) = sssp_bounded_hops(graph, seed, hops) else {
            continue;
        };
        for (id, dist) in partial.distances {
            let better = merged.distances.get(&id).map(|&d| dist < d).unwrap_or(true);
            if better {
                merged.distances.insert(id, dist);
                if let Some(&pred) = partial.predecessors.get(&id) {
                    merged.predecessors.insert(id, pred);
                } else {
                    merged.predecessors.remove(&id);
                }
            }
        }
    }
    merged.nodes_visited = merged.distances.len();
    merged
}
