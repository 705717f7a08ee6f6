//! JSONL-persisted snippet store with embedding similarity and a
//! lexical fallback.
//!
//! Documents are chunked by paragraph, embedded through the provider,
//! and appended to a JSONL index. When embeddings are unavailable
//! (no API key, endpoint without embedding support) the store degrades
//! to keyword-overlap ranking instead of failing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use sysward_core::error::RetrievalError;
use sysward_core::{EmbeddingRequest, Provider, Retriever, Snippet};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Largest chunk kept as a single indexed snippet.
const MAX_CHUNK_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedSnippet {
    content: String,
    #[serde(default)]
    metadata: Map<String, Value>,
    /// Empty when the snippet was indexed without an embedding.
    #[serde(default)]
    embedding: Vec<f32>,
}

/// File-backed implementation of [`Retriever`].
pub struct SnippetStore {
    provider: Arc<dyn Provider>,
    embedding_model: String,
    path: PathBuf,
    snippets: RwLock<Vec<IndexedSnippet>>,
}

impl SnippetStore {
    /// Open (or create) the index at `path`.
    pub fn open(
        provider: Arc<dyn Provider>,
        embedding_model: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, RetrievalError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RetrievalError::Storage(e.to_string()))?;
        }

        let mut snippets = Vec::new();
        if let Ok(raw) = std::fs::read_to_string(&path) {
            for line in raw.lines().filter(|l| !l.trim().is_empty()) {
                match serde_json::from_str::<IndexedSnippet>(line) {
                    Ok(s) => snippets.push(s),
                    Err(e) => warn!(error = %e, "Skipping unreadable index line"),
                }
            }
        }
        debug!(count = snippets.len(), path = %path.display(), "Snippet index loaded");

        Ok(Self {
            provider,
            embedding_model: embedding_model.into(),
            path,
            snippets: RwLock::new(snippets),
        })
    }

    /// Paragraph-level chunks, long paragraphs split on char boundaries.
    fn chunk(content: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        for para in content.split("\n\n") {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }
            if para.chars().count() <= MAX_CHUNK_CHARS {
                chunks.push(para.to_string());
            } else {
                let chars: Vec<char> = para.chars().collect();
                for piece in chars.chunks(MAX_CHUNK_CHARS) {
                    chunks.push(piece.iter().collect());
                }
            }
        }
        chunks
    }

    async fn embed(&self, texts: &[String]) -> Option<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            inputs: texts.to_vec(),
        };
        match self.provider.embed(request).await {
            Ok(response) if response.embeddings.len() == texts.len() => Some(response.embeddings),
            Ok(_) => {
                warn!("Embedding count mismatch, indexing without vectors");
                None
            }
            Err(e) => {
                debug!(error = %e, "Embeddings unavailable, using lexical fallback");
                None
            }
        }
    }

    fn append_lines(&self, snippets: &[IndexedSnippet]) -> Result<(), RetrievalError> {
        let mut lines = String::new();
        for snippet in snippets {
            let line = serde_json::to_string(snippet)
                .map_err(|e| RetrievalError::Storage(e.to_string()))?;
            lines.push_str(&line);
            lines.push('\n');
        }
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RetrievalError::Storage(e.to_string()))?;
        file.write_all(lines.as_bytes())
            .map_err(|e| RetrievalError::Storage(e.to_string()))
    }
}

#[async_trait]
impl Retriever for SnippetStore {
    async fn add(&self, content: &str, metadata: Map<String, Value>) -> Result<(), RetrievalError> {
        let chunks = Self::chunk(content);
        if chunks.is_empty() {
            return Ok(());
        }

        let embeddings = self.embed(&chunks).await;
        let indexed: Vec<IndexedSnippet> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, content)| IndexedSnippet {
                content,
                metadata: metadata.clone(),
                embedding: embeddings
                    .as_ref()
                    .map(|e| e[i].clone())
                    .unwrap_or_default(),
            })
            .collect();

        self.append_lines(&indexed)?;
        self.snippets.write().await.extend(indexed);
        Ok(())
    }

    async fn similar(&self, query: &str, k: usize) -> Result<Vec<Snippet>, RetrievalError> {
        let snippets = self.snippets.read().await;
        if snippets.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = if snippets.iter().any(|s| !s.embedding.is_empty()) {
            self.embed(&[query.to_string()])
                .await
                .and_then(|mut e| e.pop())
        } else {
            None
        };

        let mut ranked: Vec<Snippet> = match query_embedding {
            Some(qe) => snippets
                .iter()
                .filter(|s| !s.embedding.is_empty())
                .map(|s| Snippet {
                    content: s.content.clone(),
                    metadata: s.metadata.clone(),
                    distance: cosine_distance(&qe, &s.embedding),
                })
                .collect(),
            None => {
                let query_words = word_set(query);
                snippets
                    .iter()
                    .filter_map(|s| {
                        let overlap = word_set(&s.content).intersection(&query_words).count();
                        (overlap > 0).then(|| Snippet {
                            content: s.content.clone(),
                            metadata: s.metadata.clone(),
                            distance: 1.0 / (1.0 + overlap as f32),
                        })
                    })
                    .collect()
            }
        };

        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(k);
        Ok(ranked)
    }

    async fn count(&self) -> Result<usize, RetrievalError> {
        Ok(self.snippets.read().await.len())
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysward_core::error::ModelError;
    use sysward_core::{EmbeddingResponse, ModelRequest, ModelResponse};

    /// Returns a fixed embedding keyed on the first word of each input.
    struct KeywordEmbedder;

    #[async_trait]
    impl Provider for KeywordEmbedder {
        fn name(&self) -> &str {
            "keyword-embedder"
        }

        async fn complete(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
            Err(ModelError::NotConfigured("completions unsupported".into()))
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> Result<EmbeddingResponse, ModelError> {
            let embeddings = request
                .inputs
                .iter()
                .map(|text| match text.split_whitespace().next() {
                    Some("cpu") => vec![1.0, 0.0, 0.0],
                    Some("disk") => vec![0.0, 1.0, 0.0],
                    _ => vec![0.0, 0.0, 1.0],
                })
                .collect();
            Ok(EmbeddingResponse {
                embeddings,
                model: request.model,
            })
        }
    }

    /// No embedding support at all.
    struct NoEmbedder;

    #[async_trait]
    impl Provider for NoEmbedder {
        fn name(&self) -> &str {
            "no-embedder"
        }

        async fn complete(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
            Err(ModelError::NotConfigured("completions unsupported".into()))
        }
    }

    fn store(provider: Arc<dyn Provider>) -> (tempfile::TempDir, SnippetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnippetStore::open(provider, "test-embed", dir.path().join("index.jsonl"))
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn add_then_similar_ranks_by_embedding() {
        let (_dir, store) = store(Arc::new(KeywordEmbedder));
        store
            .add("cpu usage is high right now", Map::new())
            .await
            .unwrap();
        store
            .add("disk is nearly full", Map::new())
            .await
            .unwrap();

        let hits = store.similar("cpu load question", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].content.contains("cpu usage"));
        assert!(hits[0].distance < 0.01);
    }

    #[tokio::test]
    async fn lexical_fallback_when_embeddings_unavailable() {
        let (_dir, store) = store(Arc::new(NoEmbedder));
        store
            .add("swap pressure climbing on the database host", Map::new())
            .await
            .unwrap();
        store.add("printer out of toner", Map::new()).await.unwrap();

        let hits = store.similar("swap pressure", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].content.contains("swap"));
    }

    #[tokio::test]
    async fn empty_index_returns_empty() {
        let (_dir, store) = store(Arc::new(NoEmbedder));
        assert!(store.similar("anything", 3).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn index_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.jsonl");
        {
            let store =
                SnippetStore::open(Arc::new(NoEmbedder), "test-embed", &path).unwrap();
            store.add("uptime is nine days", Map::new()).await.unwrap();
        }
        let store = SnippetStore::open(Arc::new(NoEmbedder), "test-embed", &path).unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn paragraphs_index_as_separate_snippets() {
        let (_dir, store) = store(Arc::new(NoEmbedder));
        store
            .add("first paragraph here\n\nsecond paragraph here", Map::new())
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
