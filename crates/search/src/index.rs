//! BM25 inverted index with code-aware tokenization.
//!
//! # Architectural rules
//!
//! - A term appears in at most one posting entry per document id.
//! - Document-frequency for a term always equals the length of its posting
//!   list.
//! - Average document length is maintained as a running mean, updated
//!   exactly once per insert.
//!
//! # Thread safety
//!
//! Postings and document-frequency maps use `DashMap` for concurrent
//! reader access during search; a single writer is assumed per the
//! multiple-reader/single-writer policy at the engine layer.

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tessera_core::{CorpusStats, DocId, KindWeights};

use crate::tokenizer::tokenize;

/// One document's occurrence of a term: how many times it occurs, plus the
/// document's total length (needed for BM25 length normalization).
#[derive(Debug, Clone, Copy)]
pub struct PostingEntry {
    /// Document id.
    pub doc_id: DocId,
    /// Term frequency within the document.
    pub frequency: u32,
}

/// Ordered set of postings for one term, one entry per document.
pub type PostingList = Vec<PostingEntry>;

/// A single term-match result from a lexical search.
#[derive(Debug, Clone)]
pub struct LexResult {
    /// Matching document id.
    pub doc_id: DocId,
    /// Summed BM25 score across all matching query terms.
    pub score: f32,
    /// Query terms that matched in this document.
    pub matched_terms: Vec<String>,
}

struct DocMeta {
    kind: tessera_core::ContentKind,
    len: u32,
}

/// BM25 inverted index over a corpus of documents.
pub struct LexicalIndex {
    k1: f32,
    b: f32,
    kind_weights: KindWeights,
    postings: DashMap<String, PostingList>,
    doc_freqs: DashMap<String, u64>,
    docs: DashMap<DocId, DocMeta>,
    stats: RwLock<CorpusStats>,
    /// Monotonically increasing generation counter, bumped on every write.
    /// Gives callers a cheap way to detect "has anything changed" without
    /// taking the stats lock.
    generation: AtomicU64,
}

impl LexicalIndex {
    /// Create a new, empty index with the given BM25 parameters and
    /// content-kind weight table.
    pub fn new(k1: f32, b: f32, kind_weights: KindWeights) -> Self {
        LexicalIndex {
            k1,
            b,
            kind_weights,
            postings: DashMap::new(),
            doc_freqs: DashMap::new(),
            docs: DashMap::new(),
            stats: RwLock::new(CorpusStats::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Whether `id` is already indexed.
    pub fn contains(&self, id: DocId) -> bool {
        self.docs.contains_key(&id)
    }

    /// Index a document. Returns `false` if `id` is already present — the
    /// caller is responsible for assigning fresh ids; this is a
    /// programming-error contract, not a recoverable condition, so callers
    /// typically `assert!`/`expect` on the result rather than branch on it.
    pub fn add_document(
        &self,
        id: DocId,
        text: &str,
        kind: tessera_core::ContentKind,
    ) -> bool {
        if self.docs.contains_key(&id) {
            return false;
        }

        let tokens = tokenize(text);
        let doc_len = tokens.len() as u32;

        let mut tf: FxHashMap<&str, u32> = FxHashMap::default();
        for tok in &tokens {
            *tf.entry(*tok).or_insert(0) += 1;
        }

        for (term, frequency) in tf {
            self.postings
                .entry(term.to_string())
                .or_default()
                .push(PostingEntry {
                    doc_id: id,
                    frequency,
                });
            self.doc_freqs
                .entry(term.to_string())
                .and_modify(|c| *c += 1)
                .or_insert(1);
        }

        self.docs.insert(id, DocMeta { kind, len: doc_len });
        self.stats.write().unwrap().record(doc_len);
        self.generation.fetch_add(1, Ordering::Release);
        true
    }

    /// Remove all documents and postings, resetting the index to empty.
    pub fn clear(&self) {
        self.postings.clear();
        self.doc_freqs.clear();
        self.docs.clear();
        *self.stats.write().unwrap() = CorpusStats::default();
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Document frequency for a term: number of documents containing it.
    pub fn doc_freq(&self, term: &str) -> u64 {
        self.doc_freqs.get(term).map(|r| *r).unwrap_or(0)
    }

    /// Length of the posting list for a term (must equal `doc_freq`).
    pub fn posting_list_len(&self, term: &str) -> usize {
        self.postings.get(term).map(|p| p.len()).unwrap_or(0)
    }

    /// Total documents currently indexed.
    pub fn total_docs(&self) -> u64 {
        self.stats.read().unwrap().total_docs
    }

    /// Average document length across the corpus.
    pub fn avg_doc_len(&self) -> f32 {
        self.stats.read().unwrap().avg_doc_len()
    }

    /// Inverse document frequency for a term, clamped at 0.
    ///
    /// `IDF(t) = ln((N - df(t) + 0.5) / (df(t) + 0.5))`
    pub fn idf(&self, term: &str) -> f32 {
        let n = self.total_docs() as f32;
        let df = self.doc_freq(term) as f32;
        (((n - df + 0.5) / (df + 0.5)).ln()).max(0.0)
    }

    /// Rank up to `k` documents with positive BM25 score against `text`,
    /// descending by score, ties broken by ascending doc id.
    pub fn search(&self, text: &str, k: usize) -> Vec<LexResult> {
        let query_terms = tokenize(text);
        if query_terms.is_empty() {
            return Vec::new();
        }

        let avgdl = self.avg_doc_len().max(1.0);
        let mut scores: FxHashMap<DocId, (f32, Vec<String>)> = FxHashMap::default();

        // Dedup query terms so repeated terms don't double the IDF lookup
        // cost, but keep first-seen order for matched_terms reporting.
        let mut seen_terms = std::collections::HashSet::new();
        for term in query_terms {
            if !seen_terms.insert(term) {
                continue;
            }
            let idf = self.idf(term);
            if idf <= 0.0 {
                continue;
            }
            let Some(postings) = self.postings.get(term) else {
                continue;
            };
            for entry in postings.iter() {
                let Some(meta) = self.docs.get(&entry.doc_id) else {
                    continue;
                };
                let f = entry.frequency as f32;
                let dl = meta.len as f32;
                let tf_score =
                    f * (self.k1 + 1.0) / (f + self.k1 * (1.0 - self.b + self.b * dl / avgdl));
                let weight = self.kind_weights.get(meta.kind);
                let contribution = idf * tf_score * weight;

                let slot = scores.entry(entry.doc_id).or_insert_with(|| (0.0, Vec::new()));
                slot.0 += contribution;
                slot.1.push(term.to_string());
            }
        }

        let mut results: Vec<LexResult> = scores
            .into_iter()
            .filter(|(_, (score, _))| *score > 0.0)
            .map(|(doc_id, (score, matched_terms))| LexResult {
                doc_id,
                score,
                matched_terms,
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        results.truncate(k);
        results
    }

    /// Current write generation, bumped on every mutation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
