//! Temporal code-knowledge engine: a hybrid BM25 + ANN + graph retrieval
//! core.
//!
//! `Engine` is the external interface: ingest documents and graph edges,
//! then run [`HybridQuery`]s against the fused lexical/semantic/graph
//! signal. Everything else in this crate family — tokenization, BM25,
//! HNSW, BMSSP, fusion, caching — is reachable through it; callers who
//! need a sub-signal directly may still depend on `tessera-search`,
//! `tessera-vector`, or `tessera-graph` on their own.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod documents;

use tessera_core::{CacheStats, ContentKind, DocId, EngineConfig, Error, Result, Stats};
use tessera_graph::AdjacencyMap;
use tessera_hybrid::{HybridEngine, HybridQuery, RankedResult};
use tessera_search::LexicalIndex;
use tessera_vector::VectorIndex;
use tracing::instrument;

pub use documents::DocumentRegistry;
pub use tessera_core as core;
pub use tessera_graph as graph;
pub use tessera_hybrid as hybrid;
pub use tessera_search as search;
pub use tessera_vector as vector;

/// The retrieval engine: owns the lexical, semantic, and graph indexes,
/// the document registry, and the hybrid caching/stats layer.
pub struct Engine {
    config: EngineConfig,
    documents: DocumentRegistry,
    lexical: LexicalIndex,
    vector: VectorIndex,
    graph: AdjacencyMap,
    hybrid: HybridEngine,
}

impl Engine {
    /// Build an engine from `config`. `EngineConfig::default()` matches
    /// every default named in the configuration table (BM25 k1/b, ANN
    /// M/ef, cache capacity/TTL, default fusion weights).
    pub fn new(config: EngineConfig) -> Self {
        let lexical = LexicalIndex::new(config.bm25_k1, config.bm25_b, config.kind_weights.clone());
        let vector_config = tessera_vector::HnswConfig {
            m: config.ann_m,
            ef_construction: config.ann_ef_construction,
            ef_search: config.ann_ef_search,
            fast_construction: false,
        };
        let vector = VectorIndex::new(config.embedding_dim, vector_config, config.ann_ef_search);
        let hybrid = HybridEngine::new(&config);

        Engine {
            config,
            documents: DocumentRegistry::new(),
            lexical,
            vector,
            graph: AdjacencyMap::new(),
            hybrid,
        }
    }

    /// Index a document: runs it through the lexical index, and (if an
    /// embedding is supplied) the vector index. `kind` is inferred from
    /// `text` via lexical markers unless the caller overrides it.
    #[instrument(skip(self, text, embedding), fields(id, path))]
    pub fn add_document(
        &mut self,
        id: DocId,
        path: impl Into<String>,
        text: &str,
        embedding: Option<Vec<f32>>,
    ) -> Result<()> {
        self.add_document_with_kind(id, path, text, embedding, None)
    }

    /// Like [`Engine::add_document`], but with an explicit content-kind
    /// override instead of the heuristic inference.
    pub fn add_document_with_kind(
        &mut self,
        id: DocId,
        path: impl Into<String>,
        text: &str,
        embedding: Option<Vec<f32>>,
        kind: Option<ContentKind>,
    ) -> Result<()> {
        let path = path.into();
        let kind = kind.unwrap_or_else(|| tessera_search::infer_content_kind(text));

        if self.lexical.contains(id) {
            return Err(Error::invalid_argument(format!("duplicate document id {id}")));
        }

        if let Some(embedding) = embedding {
            self.vector
                .add(id, embedding)
                .map_err(|e| Error::invalid_argument(e.to_string()))?;
        }

        if !self.lexical.add_document(id, text, kind) {
            return Err(Error::invalid_argument(format!("duplicate document id {id}")));
        }

        self.documents.insert(id, path, kind);
        Ok(())
    }

    /// Add a directed, weighted edge to the graph index.
    pub fn add_edge(&mut self, from: DocId, to: DocId, weight: f32) -> Result<()> {
        self.graph
            .add_edge(from, to, weight)
            .map_err(|e| Error::invalid_argument(e.to_string()))
    }

    /// Reset every index, the document registry, the result cache, and
    /// engine-wide stats.
    pub fn clear(&mut self) {
        self.lexical.clear();
        self.vector.clear();
        self.graph.clear();
        self.documents.clear();
        self.hybrid.clear();
    }

    /// Run a hybrid query and return its fused, ranked results.
    #[instrument(skip(self, query))]
    pub fn search(&self, query: &HybridQuery) -> Result<Vec<RankedResult>> {
        self.hybrid.search(query, &self.lexical, &self.vector, &self.graph, |id| {
            self.documents.path(id).unwrap_or_default()
        })
    }

    /// Engine-wide running statistics.
    pub fn stats(&self) -> Stats {
        self.hybrid.stats()
    }

    /// Result-cache hit/miss/entry snapshot.
    pub fn cache_stats(&self) -> CacheStats {
        self.hybrid.cache_stats()
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
