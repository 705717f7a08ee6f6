//! knowledge_query — answers from the indexed telemetry history.

use async_trait::async_trait;
use std::sync::Arc;
use sysward_core::error::ToolError;
use sysward_core::{ModelRequest, Provider, Retriever, Tool};
use tracing::debug;

const TOP_K: usize = 5;

/// Retrieves indexed snippets relevant to the request and asks the
/// model to synthesize an answer from them.
pub struct KnowledgeQueryTool {
    retriever: Arc<dyn Retriever>,
    provider: Arc<dyn Provider>,
    model: String,
}

impl KnowledgeQueryTool {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            retriever,
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Tool for KnowledgeQueryTool {
    fn name(&self) -> &str {
        "knowledge_query"
    }

    fn description(&self) -> &str {
        "Query the local system information database for relevant historical data and insights"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let snippets = self
            .retriever
            .similar(input, TOP_K)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if snippets.is_empty() {
            return Ok("No relevant system information found for your query.".to_string());
        }
        debug!(hits = snippets.len(), "Knowledge query retrieved snippets");

        let context = snippets
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = format!(
            "Based on the following system information, answer the user's query: \"{input}\"\n\n\
             System Information:\n{context}\n\n\
             Provide a helpful and accurate response based on the system data provided. \
             Include specific metrics, timestamps, and actionable recommendations when available."
        );

        let request = ModelRequest::new(
            self.model.clone(),
            vec![sysward_core::Message::user(prompt)],
        );
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        Ok(response.content)
    }
}
