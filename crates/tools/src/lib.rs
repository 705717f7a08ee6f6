//! The six agent tools and the default registry they live in.

pub mod action;
pub mod health;
pub mod knowledge;
pub mod lookup;
pub mod metrics;
pub mod security;

pub use action::SystemActionTool;
pub use health::HealthCheckTool;
pub use knowledge::KnowledgeQueryTool;
pub use lookup::ExternalLookupTool;
pub use metrics::LiveMetricsTool;
pub use security::SecurityScanTool;

use std::sync::Arc;
use sysward_core::{Collector, Provider, Retriever, ToolRegistry};
use sysward_exec::{Confirmer, ExecPolicy};

/// Everything the default tool set needs from the session.
pub struct ToolDeps {
    pub provider: Arc<dyn Provider>,
    pub retriever: Arc<dyn Retriever>,
    pub collector: Arc<dyn Collector>,
    pub confirmer: Arc<dyn Confirmer>,
    pub policy: ExecPolicy,
    pub model: String,
    pub require_confirmation: bool,
}

/// Build the full registry in its canonical order.
pub fn default_registry(deps: ToolDeps) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(KnowledgeQueryTool::new(
        deps.retriever,
        deps.provider,
        deps.model,
    )));
    registry.register(Arc::new(LiveMetricsTool::new(
        deps.collector.clone(),
        deps.policy,
    )));
    registry.register(Arc::new(SystemActionTool::new(
        deps.confirmer,
        deps.require_confirmation,
    )));
    registry.register(Arc::new(ExternalLookupTool));
    registry.register(Arc::new(HealthCheckTool::new(deps.collector)));
    registry.register(Arc::new(SecurityScanTool::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Map;
    use sysward_core::error::{ModelError, RetrievalError};
    use sysward_core::{
        Error, ModelRequest, ModelResponse, SafetyClass, Snippet, SystemSnapshot, Tool,
    };
    use sysward_exec::FixedConfirmer;

    struct StubProvider;

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
            Ok(ModelResponse {
                content: "synthesized answer".to_string(),
                model: "stub".to_string(),
                usage: None,
            })
        }
    }

    struct StubRetriever {
        snippets: Vec<Snippet>,
    }

    #[async_trait]
    impl Retriever for StubRetriever {
        async fn add(&self, _content: &str, _metadata: Map<String, serde_json::Value>) -> Result<(), RetrievalError> {
            Ok(())
        }

        async fn similar(&self, _query: &str, k: usize) -> Result<Vec<Snippet>, RetrievalError> {
            Ok(self.snippets.iter().take(k).cloned().collect())
        }

        async fn count(&self) -> Result<usize, RetrievalError> {
            Ok(self.snippets.len())
        }
    }

    struct StubCollector;

    #[async_trait]
    impl Collector for StubCollector {
        fn platform(&self) -> &str {
            "linux"
        }

        async fn collect(&self) -> Result<SystemSnapshot, Error> {
            Ok(SystemSnapshot {
                platform: "linux".into(),
                cpu: "CPU Usage: 7.0% average".into(),
                memory: "Physical Memory: 2.0GB / 8.0GB".into(),
                uptime: "up 2 days".into(),
                ..Default::default()
            })
        }
    }

    fn registry() -> ToolRegistry {
        default_registry(ToolDeps {
            provider: Arc::new(StubProvider),
            retriever: Arc::new(StubRetriever { snippets: vec![] }),
            collector: Arc::new(StubCollector),
            confirmer: Arc::new(FixedConfirmer(false)),
            policy: ExecPolicy::new(true, vec!["uptime".to_string()]),
            model: "stub-model".to_string(),
            require_confirmation: true,
        })
    }

    #[test]
    fn registry_has_the_six_tools_in_order() {
        let registry = registry();
        assert_eq!(
            registry.names(),
            vec![
                "knowledge_query",
                "live_metrics",
                "system_action",
                "external_lookup",
                "health_check",
                "security_scan"
            ]
        );
    }

    #[test]
    fn only_system_action_is_mutating() {
        let registry = registry();
        for tool in registry.all() {
            let expected = if tool.name() == "system_action" {
                SafetyClass::Mutating
            } else {
                SafetyClass::ReadOnly
            };
            assert_eq!(tool.safety_class(), expected, "{}", tool.name());
        }
    }

    #[tokio::test]
    async fn knowledge_query_without_hits_reports_nothing_found() {
        let registry = registry();
        let out = registry.invoke("knowledge_query", "anything").await.unwrap();
        assert!(out.contains("No relevant system information"));
    }

    #[tokio::test]
    async fn knowledge_query_with_hits_synthesizes() {
        let tool = KnowledgeQueryTool::new(
            Arc::new(StubRetriever {
                snippets: vec![Snippet {
                    content: "CPU Usage: 93%".to_string(),
                    metadata: Map::new(),
                    distance: 0.1,
                }],
            }),
            Arc::new(StubProvider),
            "stub-model",
        );
        let out = tool.invoke("cpu history").await.unwrap();
        assert_eq!(out, "synthesized answer");
    }

    #[tokio::test]
    async fn live_metrics_answers_topic_from_snapshot() {
        let registry = registry();
        let out = registry.invoke("live_metrics", "cpu usage").await.unwrap();
        assert!(out.contains("7.0%"));
    }

    #[tokio::test]
    async fn live_metrics_rejects_unlisted_command() {
        let registry = registry();
        let err = registry
            .invoke("live_metrics", "rm -rf /")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("whitelist"));
    }

    #[tokio::test]
    async fn health_check_stitches_sections() {
        let registry = registry();
        let out = registry.invoke("health_check", "").await.unwrap();
        assert!(out.contains("CPU Status"));
        assert!(out.contains("Memory Status"));
        assert!(out.contains("Uptime"));
        // Empty sections are skipped.
        assert!(!out.contains("Disk Status"));
    }

    #[tokio::test]
    async fn external_lookup_mentions_the_query() {
        let registry = registry();
        let out = registry
            .invoke("external_lookup", "nginx 502")
            .await
            .unwrap();
        assert!(out.contains("nginx 502"));
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let registry = registry();
        let err = registry.invoke("no_such_tool", "").await.unwrap_err();
        assert!(matches!(
            err,
            sysward_core::error::ToolError::NotFound(_)
        ));
    }
}
