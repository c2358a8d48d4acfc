//! Document identity registry: maps a document id to its path and kind.
//!
//! Owned by [`crate::Engine`] alongside the retrieval indexes so ranked
//! results can be resolved back to a source path without the `tessera-hybrid`
//! or `tessera-search` crates needing to know about paths at all.

use std::collections::HashMap;
use tessera_core::{ContentKind, DocId};

/// Per-document identity records, keyed by id.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    entries: HashMap<DocId, (String, ContentKind)>,
}

impl DocumentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        DocumentRegistry::default()
    }

    /// Record a document's path and content kind.
    pub fn insert(&mut self, id: DocId, path: String, kind: ContentKind) {
        self.entries.insert(id, (path, kind));
    }

    /// The path recorded for `id`, if any.
    pub fn path(&self, id: DocId) -> Option<String> {
        self.entries.get(&id).map(|(path, _)| path.clone())
    }

    /// The content kind recorded for `id`, if any.
    pub fn kind(&self, id: DocId) -> Option<ContentKind> {
        self.entries.get(&id).map(|(_, kind)| *kind)
    }

    /// Number of documents registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
