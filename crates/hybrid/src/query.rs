//! The hybrid query contract: what a caller asks for, and how the
//! planner validates it before running anything.

use tessera_core::{DocId, Error, Result};

/// Which sub-search the caller wants prioritized. Changes routing, not
/// fusion weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingPreference {
    /// No preference: route by weight/input-presence alone.
    #[default]
    None,
    /// Always run lexical search; others only if their weight exceeds 0.1.
    PreferExact,
    /// Run semantic search if an embedding is present; others only if
    /// their weight exceeds 0.1.
    PreferSemantic,
    /// Run graph search if seeds are present; others only if their
    /// weight exceeds 0.1.
    PreferRelated,
}

/// A hybrid retrieval request.
#[derive(Debug, Clone)]
pub struct HybridQuery {
    /// Query text. Required non-empty for lexical search to run.
    pub text: String,
    /// Query embedding. Required to run semantic (ANN) search.
    pub embedding: Option<Vec<f32>>,
    /// Seed document ids to search the graph from. Required to run graph
    /// search.
    pub seeds: Option<Vec<DocId>>,
    /// Maximum results returned.
    pub k: usize,
    /// Graph search bound, in edge count.
    pub hops: u32,
    /// Lexical fusion weight.
    pub alpha: f32,
    /// Semantic fusion weight.
    pub beta: f32,
    /// Graph fusion weight.
    pub gamma: f32,
    /// Routing preference.
    pub routing: RoutingPreference,
    /// Whether `with_weights` was called. When `false`, the engine
    /// substitutes `EngineConfig`'s `default_alpha`/`beta`/`gamma` before
    /// running the query, per "Default lexical/semantic/graph weights if
    /// caller omits".
    pub(crate) weights_explicit: bool,
}

impl HybridQuery {
    /// Start building a query over `text` with the given top-k, using a
    /// uniform `(alpha, beta, gamma) = (1/3, 1/3, 1/3)` placeholder weight
    /// until either `with_weights` is called or the owning engine applies
    /// its configured defaults, and no routing preference.
    pub fn new(text: impl Into<String>, k: usize) -> Self {
        HybridQuery {
            text: text.into(),
            embedding: None,
            seeds: None,
            k,
            hops: 3,
            alpha: 1.0 / 3.0,
            beta: 1.0 / 3.0,
            gamma: 1.0 / 3.0,
            routing: RoutingPreference::None,
            weights_explicit: false,
        }
    }

    /// Attach a query embedding to enable semantic search.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Attach seed document ids to enable graph search.
    pub fn with_seeds(mut self, seeds: Vec<DocId>) -> Self {
        self.seeds = Some(seeds);
        self
    }

    /// Override the graph hop bound.
    pub fn with_hops(mut self, hops: u32) -> Self {
        self.hops = hops;
        self
    }

    /// Override the fusion weights.
    pub fn with_weights(mut self, alpha: f32, beta: f32, gamma: f32) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self.gamma = gamma;
        self.weights_explicit = true;
        self
    }

    /// Substitute `default_alpha`/`beta`/`gamma` for the placeholder
    /// weights set by `new`, unless the caller already supplied explicit
    /// weights via `with_weights`.
    pub(crate) fn apply_default_weights(&mut self, alpha: f32, beta: f32, gamma: f32) {
        if !self.weights_explicit {
            self.alpha = alpha;
            self.beta = beta;
            self.gamma = gamma;
        }
    }

    /// Set a routing preference.
    pub fn with_routing(mut self, routing: RoutingPreference) -> Self {
        self.routing = routing;
        self
    }

    /// Validate the query: weights must be non-negative and sum to
    /// `1 +/- 0.01`.
    pub fn validate(&self) -> Result<()> {
        if self.alpha < 0.0 || self.beta < 0.0 || self.gamma < 0.0 {
            return Err(Error::invalid_argument("fusion weights must be non-negative"));
        }
        let sum = self.alpha + self.beta + self.gamma;
        if (sum - 1.0).abs() > 0.01 {
            return Err(Error::invalid_argument(format!(
                "fusion weights must sum to 1 +/- 0.01, got {sum}"
            )));
        }
        Ok(())
    }

    /// Whether lexical search should run for this query under `prefer_exact`
    /// routing or the default routing rule.
    pub fn wants_lexical(&self) -> bool {
        if self.text.trim().is_empty() {
            return false;
        }
        match self.routing {
            RoutingPreference::PreferExact => true,
            RoutingPreference::PreferSemantic | RoutingPreference::PreferRelated => {
                self.alpha > 0.1
            }
            RoutingPreference::None => self.alpha >= 0.05,
        }
    }

    /// Whether semantic search should run.
    pub fn wants_semantic(&self) -> bool {
        if self.embedding.is_none() {
            return false;
        }
        match self.routing {
            RoutingPreference::PreferSemantic => true,
            RoutingPreference::PreferExact | RoutingPreference::PreferRelated => self.beta > 0.1,
            RoutingPreference::None => self.beta >= 0.05,
        }
    }

    /// Whether graph search should run.
    pub fn wants_graph(&self) -> bool {
        if self.seeds.as_ref().map(|s| s.is_empty()).unwrap_or(true) {
            return false;
        }
        match self.routing {
            RoutingPreference::PreferRelated => true,
            RoutingPreference::PreferExact | RoutingPreference::PreferSemantic => self.gamma > 0.1,
            RoutingPreference::None => self.gamma >= 0.05,
        }
    }
}
