//! Provider trait — the abstraction over the language-model collaborator.
//!
//! A Provider knows how to send a prompt to an LLM and get text back.
//! The reasoning loop calls `complete()` without knowing which backend
//! is configured. Embeddings are exposed on the same trait because the
//! retrieval collaborator needs them from the same credential.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::message::Message;

/// A request for one model completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The model to use (e.g., "gemini-2.0-flash")
    pub model: String,

    /// The prompt messages (system + history + user)
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Stop sequences (the ReAct loop stops generation at "Observation:")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

fn default_temperature() -> f32 {
    0.1
}

impl ModelRequest {
    /// Build a request with the configured defaults.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: default_temperature(),
            max_tokens: None,
            stop: Vec::new(),
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated text
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics, when the provider reports them
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// The model to use for embeddings
    pub model: String,

    /// The texts to embed
    pub inputs: Vec<String>,
}

/// An embedding response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The embedding vectors, one per input text
    pub embeddings: Vec<Vec<f32>>,

    /// Which model was used
    pub model: String,
}

/// The core Provider trait.
///
/// Every LLM backend implements this trait. Transport and quota failures
/// surface as [`ModelError`]; callers inside the orchestration layer
/// convert them into an error-flagged `AgentResult`, never a panic.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send a prompt and get a complete text response.
    async fn complete(
        &self,
        request: ModelRequest,
    ) -> std::result::Result<ModelResponse, ModelError>;

    /// Generate embeddings for the given texts.
    ///
    /// Default implementation returns an error indicating embeddings
    /// aren't supported; the retrieval store falls back to keyword
    /// similarity in that case.
    async fn embed(
        &self,
        _request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ModelError> {
        Err(ModelError::NotConfigured(format!(
            "Provider '{}' does not support embeddings",
            self.name()
        )))
    }

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ModelError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = ModelRequest::new("gemini-2.0-flash", vec![Message::user("hi")]);
        assert!((req.temperature - 0.1).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
        assert!(req.stop.is_empty());
    }

    #[test]
    fn request_serialization_skips_empty_stop() {
        let req = ModelRequest::new("m", vec![]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("stop"));
    }
}
