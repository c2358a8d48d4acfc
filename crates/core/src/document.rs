//! Document identity and corpus-level bookkeeping shared by every index.
//!
//! A `Document` is immutable once created: a new version of a file must be
//! ingested under a fresh id. Indexes own their own per-document state
//! (postings, embeddings, adjacency); this module only carries the identity
//! and corpus statistics that all three retrieval signals agree on.

use std::collections::HashMap;

/// Unique 32-bit document id assigned by the caller.
pub type DocId = u32;

/// Heuristic classification of a document's dominant content, used as a
/// BM25 content-weight multiplier and reported on ranked results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Function or method body.
    FunctionBody,
    /// Type, interface, struct, or class definition.
    TypeDefinition,
    /// Variable, constant, or binding declaration.
    VariableDeclaration,
    /// Comment block.
    CommentBlock,
    /// None of the above markers matched.
    Mixed,
}

impl ContentKind {
    /// All variants, in the priority order used by content-kind inference.
    pub const ALL: [ContentKind; 5] = [
        ContentKind::FunctionBody,
        ContentKind::TypeDefinition,
        ContentKind::VariableDeclaration,
        ContentKind::CommentBlock,
        ContentKind::Mixed,
    ];
}

impl Default for ContentKind {
    fn default() -> Self {
        ContentKind::Mixed
    }
}

/// Immutable record of one indexed document's identity.
#[derive(Debug, Clone)]
pub struct Document {
    /// Caller-assigned unique id.
    pub id: DocId,
    /// Opaque source path, not interpreted by the core.
    pub path: String,
    /// Total token count produced by the tokenizer for this document.
    pub token_count: u32,
    /// Inferred (or caller-supplied) content kind.
    pub kind: ContentKind,
}

impl Document {
    /// Construct a new document record.
    pub fn new(id: DocId, path: impl Into<String>, token_count: u32, kind: ContentKind) -> Self {
        Document {
            id,
            path: path.into(),
            token_count,
            kind,
        }
    }
}

/// Running corpus-wide statistics maintained by the lexical index.
///
/// Invariant: `avg_doc_len == total_tokens / total_docs` whenever
/// `total_docs > 0`.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    /// Total number of documents indexed.
    pub total_docs: u64,
    /// Sum of token counts across all indexed documents.
    pub total_tokens: u64,
}

impl CorpusStats {
    /// Record a newly indexed document of the given token length.
    pub fn record(&mut self, token_count: u32) {
        self.total_docs += 1;
        self.total_tokens += token_count as u64;
    }

    /// Average document length in tokens, maintained as a running mean.
    pub fn avg_doc_len(&self) -> f32 {
        if self.total_docs == 0 {
            0.0
        } else {
            self.total_tokens as f32 / self.total_docs as f32
        }
    }
}

/// Per-content-kind BM25 weight multiplier.
#[derive(Debug, Clone)]
pub struct KindWeights {
    weights: HashMap<&'static str, f32>,
}

impl Default for KindWeights {
    fn default() -> Self {
        let mut weights = HashMap::new();
        weights.insert("function", 3.0);
        weights.insert("type", 2.5);
        weights.insert("variable", 2.0);
        weights.insert("comment", 1.0);
        weights.insert("mixed", 1.0);
        KindWeights { weights }
    }
}

impl KindWeights {
    /// Weight multiplier for the given content kind.
    pub fn get(&self, kind: ContentKind) -> f32 {
        let key = match kind {
            ContentKind::FunctionBody => "function",
            ContentKind::TypeDefinition => "type",
            ContentKind::VariableDeclaration => "variable",
            ContentKind::CommentBlock => "comment",
            ContentKind::Mixed => "mixed",
        };
        self.weights.get(key).copied().unwrap_or(1.0)
    }

    /// Override the weight for a content kind.
    pub fn set(&mut self, kind: ContentKind, weight: f32) {
        let key = match kind {
            ContentKind::FunctionBody => "function",
            ContentKind::TypeDefinition => "type",
            ContentKind::VariableDeclaration => "variable",
            ContentKind::CommentBlock => "comment",
            ContentKind::Mixed => "mixed",
        };
        self.weights.insert(key, weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_stats_avg() {
        let mut stats = CorpusStats::default();
        stats.record(10);
        stats.record(20);
        assert_eq!(stats.total_docs, 2);
        assert_eq!(stats.total_tokens, 30);
        assert!((stats.avg_doc_len() - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_corpus_stats_empty() {
        let stats = CorpusStats::default();
        assert_eq!(stats.avg_doc_len(), 0.0);
    }

    #[test]
    fn test_kind_weights_defaults() {
        let weights = KindWeights::default();
        assert_eq!(weights.get(ContentKind::FunctionBody), 3.0);
        assert_eq!(weights.get(ContentKind::TypeDefinition), 2.5);
        assert_eq!(weights.get(ContentKind::VariableDeclaration), 2.0);
        assert_eq!(weights.get(ContentKind::CommentBlock), 1.0);
        assert_eq!(weights.get(ContentKind::Mixed), 1.0);
    }

    #[test]
    fn test_kind_weights_override() {
        let mut weights = KindWeights::default();
        weights.set(ContentKind::FunctionBody, 5.0);
        assert_eq!(weights.get(ContentKind::FunctionBody), 5.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Average document length always equals the running sum of token
        /// counts divided by the document count, for any insert sequence.
        #[test]
        fn avg_doc_len_matches_running_sum(lens in prop::collection::vec(0u32..5000, 1..200)) {
            let mut stats = CorpusStats::default();
            for &len in &lens {
                stats.record(len);
            }
            let expected = lens.iter().map(|&l| l as f64).sum::<f64>() / lens.len() as f64;
            prop_assert!((stats.avg_doc_len() as f64 - expected).abs() < 1e-3 * expected.max(1.0));
        }
    }
}
