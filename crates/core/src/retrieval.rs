//! Retriever trait — the vector-similarity collaborator.
//!
//! The core treats nearest-neighbor search as a black-box service:
//! `similar(query, k)` returns ranked snippets of previously indexed
//! telemetry documents. An empty result is a valid answer ("no relevant
//! information"), not a failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RetrievalError;

/// One ranked snippet returned from a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    /// The snippet text.
    pub content: String,

    /// Metadata attached at indexing time (timestamp, platform, ...).
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Distance from the query (smaller is closer).
    pub distance: f32,
}

/// The retrieval collaborator.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Index a document, splitting and embedding as the backend sees fit.
    async fn add(
        &self,
        content: &str,
        metadata: Map<String, Value>,
    ) -> std::result::Result<(), RetrievalError>;

    /// Return up to `k` snippets ranked by similarity to `query`.
    /// An empty vector is a valid, non-error response.
    async fn similar(
        &self,
        query: &str,
        k: usize,
    ) -> std::result::Result<Vec<Snippet>, RetrievalError>;

    /// Number of indexed snippets.
    async fn count(&self) -> std::result::Result<usize, RetrievalError>;
}
