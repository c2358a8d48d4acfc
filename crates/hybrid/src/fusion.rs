//! Score normalization and weighted fusion across the three retrieval
//! signals.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tessera_core::DocId;
use tessera_graph::SsspResult;
use tessera_search::LexResult;
use tessera_vector::Neighbor;

/// One document's place in a fused, ranked result list. Serializable as
/// the on-wire shape returned to callers outside the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// Document id.
    pub id: DocId,
    /// Source path, resolved by the caller's document registry.
    pub path: String,
    /// Normalized BM25 contribution, in `[0, 1]`.
    pub bm25: f32,
    /// Normalized semantic contribution, in `[0, 1]`.
    pub semantic: f32,
    /// Normalized graph contribution, in `[0, 1]`.
    pub graph: f32,
    /// `alpha*bm25 + beta*semantic + gamma*graph`.
    pub combined: f32,
    /// Query terms that matched lexically, if any.
    pub terms: Vec<String>,
    /// Graph distance from the nearest seed, if the graph sub-search
    /// contributed this document.
    pub distance: Option<f32>,
}

/// Map raw lexical scores into `[0, 1]` by dividing by the maximum score
/// in the set (1.0 if the set is empty or all-zero).
fn normalize_lexical(results: &[LexResult]) -> FxHashMap<DocId, (f32, Vec<String>)> {
    let max = results.iter().map(|r| r.score).fold(0.0f32, f32::max);
    let denom = if max > 0.0 { max } else { 1.0 };
    results
        .iter()
        .map(|r| (r.doc_id, (r.score / denom, r.matched_terms.clone())))
        .collect()
}

/// Cosine similarity is used as-is, clamped at 0 for negative values
/// (non-unit embeddings may produce similarities outside `[0, 1]`).
fn normalize_semantic(results: &[Neighbor]) -> FxHashMap<DocId, f32> {
    results
        .iter()
        .map(|n| (n.id, n.similarity.max(0.0)))
        .collect()
}

/// `1 - distance/max_distance`; unreachable documents (not present in the
/// graph result) contribute 0 and are not included here.
fn normalize_graph(result: &SsspResult) -> FxHashMap<DocId, (f32, f32)> {
    let max_distance = result.distances.values().copied().fold(0.0f32, f32::max);
    let denom = if max_distance > 0.0 { max_distance } else { 1.0 };
    result
        .distances
        .iter()
        .map(|(&id, &d)| (id, (1.0 - d / denom, d)))
        .collect()
}

/// Fuse lexical, semantic, and graph candidates into a single ranked
/// list: `combined = alpha*bm25' + beta*sem' + gamma*graph'`, sorted
/// descending by combined score, ties broken by ascending doc id.
/// `ids_scratch` is a caller-owned buffer reused across calls for the
/// candidate id union, avoiding a fresh allocation per query.
#[allow(clippy::too_many_arguments)]
pub fn fuse(
    lexical: &[LexResult],
    semantic: &[Neighbor],
    graph: Option<&SsspResult>,
    alpha: f32,
    beta: f32,
    gamma: f32,
    k: usize,
    path_of: impl Fn(DocId) -> String,
    ids_scratch: &mut Vec<DocId>,
) -> Vec<RankedResult> {
    let lex_norm = normalize_lexical(lexical);
    let sem_norm = normalize_semantic(semantic);
    let graph_norm = graph.map(normalize_graph).unwrap_or_default();

    ids_scratch.clear();
    let mut seen = std::collections::HashSet::new();
    for &id in lex_norm.keys().chain(sem_norm.keys()).chain(graph_norm.keys()) {
        if seen.insert(id) {
            ids_scratch.push(id);
        }
    }

    let mut results: Vec<RankedResult> = ids_scratch
        .iter()
        .map(|&id| {
            let (bm25, terms) = lex_norm.get(&id).cloned().unwrap_or((0.0, Vec::new()));
            let semantic = sem_norm.get(&id).copied().unwrap_or(0.0);
            let (graph_score, distance) = graph_norm
                .get(&id)
                .map(|&(g, d)| (g, Some(d)))
                .unwrap_or((0.0, None));
            let combined = alpha * bm25 + beta * semantic + gamma * graph_score;
            RankedResult {
                id,
                path: path_of(id),
                bm25,
                semantic,
                graph: graph_score,
                combined,
                terms,
                distance,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.combined
            .partial_cmp(&a.combined)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    results.truncate(k);
    results
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Fused results are always sorted descending by combined score,
        /// ties broken by ascending doc id, regardless of input order.
        #[test]
        fn sorted_descending_with_id_tiebreak(
            mut scores in prop::collection::vec((0u32..30, 0.0f32..10.0), 0..25),
        ) {
            scores.dedup_by_key(|(id, _)| *id);
            let lexical: Vec<LexResult> = scores
                .iter()
                .map(|&(id, score)| LexResult { doc_id: id, score, matched_terms: vec![] })
                .collect();
            let results = fuse(&lexical, &[], None, 1.0, 0.0, 0.0, scores.len(), |_| String::new(), &mut Vec::new());
            for pair in results.windows(2) {
                let ordered = pair[0].combined > pair[1].combined
                    || (pair[0].combined == pair[1].combined && pair[0].id < pair[1].id);
                prop_assert!(ordered);
            }
        }

        /// Combined score always equals the documented weighted sum within
        /// the stated tolerance.
        #[test]
        fn combined_matches_weighted_sum(
            lex_score in 0.001f32..10.0,
            sem_score in 0.0f32..1.0,
            alpha in 0.0f32..1.0,
        ) {
            let beta = 1.0 - alpha;
            let lexical = vec![LexResult { doc_id: 1, score: lex_score, matched_terms: vec![] }];
            let semantic = vec![Neighbor { id: 1, similarity: sem_score }];
            let results = fuse(&lexical, &semantic, None, alpha, beta, 0.0, 5, |_| String::new(), &mut Vec::new());
            let expected = alpha * 1.0 + beta * sem_score.max(0.0);
            prop_assert!((results[0].combined - expected).abs() < 1e-3);
        }
    }
}
