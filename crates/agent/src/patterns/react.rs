//! Reactive strategy: one loop, full tool set, default budget.

use async_trait::async_trait;
use sysward_core::{AgentResult, PatternId};

use crate::engine::{PromptTemplate, ReasoningLoop};
use crate::factory::Collaborators;
use crate::patterns::{cached, Strategy};

pub(crate) const REACT_SYSTEM: &str = "You are sysward, a system administration assistant. \
Think step by step about the user's question, use tools to gather real evidence from the host, \
and only give a Final Answer once the evidence supports it.";

pub struct ReactStrategy {
    collab: Collaborators,
    template: PromptTemplate,
}

impl ReactStrategy {
    pub fn new(collab: Collaborators) -> Self {
        Self {
            collab,
            template: PromptTemplate::new(REACT_SYSTEM),
        }
    }
}

#[async_trait]
impl Strategy for ReactStrategy {
    fn pattern(&self) -> PatternId {
        PatternId::React
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
    use std::sync::Arc;

    #[tokio::test]
    async fn answers_and_caches() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Thought: easy\nFinal Answer: it works",
        ]));
        let collab = Collaborators::for_tests(provider.clone(), named_registry());
        let strategy = ReactStrategy::new(collab);

        let first = strategy.execute_query("does it work?").await;
        assert_eq!(first.output, "it works");
        assert_eq!(provider.calls(), 1);

        // Script is exhausted; only the cache can answer now.
        let second = strategy.execute_query("does it work?").await;
        assert_eq!(second.output, "it works");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn configured_sampling_reaches_the_provider() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Thought: t\nFinal Answer: ok",
        ]));
        let mut collab = Collaborators::for_tests(provider.clone(), named_registry());
        collab.temperature = 0.9;
        collab.max_tokens = 256;
        let strategy = ReactStrategy::new(collab);
        strategy.execute_query("q").await;
        let request = provider.last_request().unwrap();
        assert!((request.temperature - 0.9).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, Some(256));
    }

    #[tokio::test]
    async fn error_results_are_not_cached() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let collab = Collaborators::for_tests(provider.clone(), named_registry());
        let strategy = ReactStrategy::new(collab);

        let first = strategy.execute_query("q").await;
        assert!(first.error);
        let second = strategy.execute_query("q").await;
        assert!(second.error);
        assert_eq!(provider.calls(), 2);
    }
}
