//! Conversational strategy: reactive loop with the session window
//! injected as prior turns.

use async_trait::async_trait;
use sysward_core::{AgentResult, PatternId};

use crate::engine::{PromptTemplate, ReasoningLoop};
use crate::factory::Collaborators;
use crate::patterns::{cached, Strategy};

pub(crate) const CONVERSATIONAL_SYSTEM: &str = "You are sysward, a system administration \
assistant holding an ongoing conversation. Use the previous conversation to resolve references \
like \"it\" or \"that process\", use tools for fresh evidence, and answer in a way that follows \
on naturally from the conversation.";

pub struct ConversationalStrategy {
    collab: Collaborators,
    system: String,
}

impl ConversationalStrategy {
    pub fn new(collab: Collaborators) -> Self {
        Self {
            collab,
            system: CONVERSATIONAL_SYSTEM.to_string(),
        }
    }

    /// The session window rendered as prior turns, or None early in a
    /// session (or if the memory lock is poisoned).
    fn window_context(&self) -> Option<String> {
        let memory = self.collab.memory.lock().ok()?;
        let window = memory.session_window();
        if window.is_empty() {
            return None;
        }
        let turns = window
            .iter()
            .map(|i| format!("User: {}\nAssistant: {}", i.user_input, i.ai_response))
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!("Previous conversation:\n{turns}"))
    }
}

#[async_trait]
impl Strategy for ConversationalStrategy {
    fn pattern(&self) -> PatternId {
        PatternId::Conversational
    }

    fn prompt_template(&self) -> &str {
        &self.system
    }

    async fn execute_query(&self, query: &str) -> AgentResult {
        let mut template = PromptTemplate::new(self.system.clone());
        if let Some(context) = self.window_context() {
            template = template.with_context(context);
        }

        cached(&self.collab.cache, query, async {
            let engine = ReasoningLoop::new(
                self.collab.provider.clone(),
                self.collab.model.clone(),
                self.collab.max_iterations,
            )
            .with_sampling(self.collab.temperature, self.collab.max_tokens);
            engine
                .run(query, &self.collab.tools.all(), &template)
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
    async fn empty_session_has_no_context() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Thought: fresh start\nFinal Answer: hello",
        ]));
        let collab = Collaborators::for_tests(provider, named_registry());
        let strategy = ConversationalStrategy::new(collab);
        assert!(strategy.window_context().is_none());
        let result = strategy.execute_query("hi").await;
        assert_eq!(result.output, "hello");
    }

    #[tokio::test]
    async fn prior_turns_are_rendered_into_context() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Thought: follow-up\nFinal Answer: still chrome",
        ]));
        let collab = Collaborators::for_tests(provider, named_registry());
        collab
            .memory
            .lock()
            .unwrap()
            .add_interaction("what is eating my cpu", "chrome is", serde_json::Map::new())
            .unwrap();

        let strategy = ConversationalStrategy::new(collab);
        let context = strategy.window_context().unwrap();
        assert!(context.contains("User: what is eating my cpu"));
        assert!(context.contains("Assistant: chrome is"));

        let result = strategy.execute_query("and now?").await;
        assert_eq!(result.output, "still chrome");
    }
}
