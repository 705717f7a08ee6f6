//! Self-Ask strategy: decompose into sub-questions, preferring a
//! search-capable tool, with a silent reactive fallback.

use async_trait::async_trait;
use std::sync::Arc;
use sysward_core::{AgentResult, PatternId, Tool};
use tracing::debug;

use crate::engine::{PromptTemplate, ReasoningLoop};
use crate::factory::Collaborators;
use crate::patterns::{cached, Strategy};

pub(crate) const SELF_ASK_SYSTEM: &str = "You are sysward, a system administration assistant. \
Break the question into smaller sub-questions. In each Thought, state the next sub-question \
you need answered, then use a tool to answer it. Once every sub-question is resolved, combine \
the intermediate answers into the Final Answer.";

/// Tool names that can serve as the intermediate-answer lookup.
const SEARCH_TOOLS: [&str; 2] = ["knowledge_query", "external_lookup"];

pub struct SelfAskStrategy {
    collab: Collaborators,
    template: PromptTemplate,
    /// The preferred search tool, when one is registered.
    search_tool: Option<Arc<dyn Tool>>,
}

impl SelfAskStrategy {
    pub fn new(collab: Collaborators) -> Self {
        let search_tool = SEARCH_TOOLS.iter().find_map(|n| collab.tools.get(n));
        Self {
            collab,
            template: PromptTemplate::new(SELF_ASK_SYSTEM),
            search_tool,
        }
    }
}

#[async_trait]
impl Strategy for SelfAskStrategy {
    fn pattern(&self) -> PatternId {
        PatternId::SelfAsk
    }

    fn prompt_template(&self) -> &str {
        &self.template.system
    }

    async fn execute_query(&self, query: &str) -> AgentResult {
        cached(&self.collab.cache, query, async {
            let engine = ReasoningLoop::new(
                self.collab.provider.clone(),
                self.collab.model.clone(),
                self.collab.max_iterations,
            )
            .with_sampling(self.collab.temperature, self.collab.max_tokens);

            // First attempt: the search tool alone keeps the loop focused
            // on question decomposition.
            if let Some(tool) = &self.search_tool {
                let restricted = vec![tool.clone()];
                let result = engine.run(query, &restricted, &self.template).await;
                if !result.error {
                    return result;
                }
                debug!("Search-tool path failed, falling back to the full tool set");
            }

            // Fallback is silent: same result shape, full tool set.
            engine
                .run(query, &self.collab.tools.all(), &self.template)
                .await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_helpers::{named_registry, ScriptedProvider};
    use sysward_core::ToolRegistry;

    #[tokio::test]
    async fn prefers_the_search_tool() {
        let strategy = SelfAskStrategy::new(Collaborators::for_tests(
            Arc::new(ScriptedProvider::new(vec![])),
            named_registry(),
        ));
        assert_eq!(
            strategy.search_tool.as_ref().unwrap().name(),
            "knowledge_query"
        );
    }

    #[tokio::test]
    async fn no_search_tool_uses_the_full_set() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(crate::patterns::test_helpers::FixedTool {
            tool_name: "live_metrics",
            answer: "cpu 5%",
        }));
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Thought: sub-question: current load?\nAction: live_metrics\nAction Input: cpu",
            "Thought: resolved\nFinal Answer: load is low",
        ]));
        let strategy =
            SelfAskStrategy::new(Collaborators::for_tests(provider, Arc::new(registry)));
        assert!(strategy.search_tool.is_none());
        let result = strategy.execute_query("is the box loaded?").await;
        assert_eq!(result.output, "load is low");
    }

    #[tokio::test]
    async fn failed_search_path_falls_back_silently() {
        // Call one (search-tool attempt) errors; call two (fallback) answers.
        let provider = Arc::new(ScriptedProvider::with_initial_error(vec![
            "Thought: retry simpler\nFinal Answer: fallback worked",
        ]));
        let strategy = SelfAskStrategy::new(Collaborators::for_tests(
            provider.clone(),
            named_registry(),
        ));
        let result = strategy.execute_query("complex question").await;
        assert!(!result.error);
        assert_eq!(result.output, "fallback worked");
        assert_eq!(provider.calls(), 2);
    }
}
