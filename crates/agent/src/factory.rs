//! Strategy construction and runtime pattern switching.

use std::sync::{Arc, Mutex};
use sysward_cache::ResponseCache;
use sysward_core::{AgentResult, PatternId, Provider, ToolRegistry};
use sysward_memory::MemoryManager;
use tracing::info;

use crate::patterns::{
    ConversationalStrategy, MultiAgentStrategy, PlanExecuteStrategy, ReactStrategy,
    SelfAskStrategy, Strategy,
};

/// Everything a strategy needs, constructed once at session start and
/// passed explicitly. No strategy owns any of it.
#[derive(Clone)]
pub struct Collaborators {
    pub provider: Arc<dyn Provider>,
    pub tools: Arc<ToolRegistry>,
    pub cache: Arc<ResponseCache>,
    pub memory: Arc<Mutex<MemoryManager>>,
    pub model: String,
    pub max_iterations: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[cfg(test)]
impl Collaborators {
    /// Collaborators over temp-dir storage for strategy tests.
    pub fn for_tests(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>) -> Self {
        let dir = tempfile::tempdir().expect("tempdir").keep();
        Self {
            provider,
            tools,
            cache: Arc::new(
                ResponseCache::new(dir.join("cache"), std::time::Duration::from_secs(300))
                    .expect("cache"),
            ),
            memory: Arc::new(Mutex::new(
                MemoryManager::open(dir.join("memory.json")).expect("memory"),
            )),
            model: "test-model".to_string(),
            max_iterations: 5,
            temperature: 0.1,
            max_tokens: 1024,
        }
    }
}

/// Build the strategy for a pattern against the given collaborators.
pub fn build_strategy(pattern: PatternId, collab: Collaborators) -> Box<dyn Strategy> {
    match pattern {
        PatternId::React => Box::new(ReactStrategy::new(collab)),
        PatternId::PlanExecute => Box::new(PlanExecuteStrategy::new(collab)),
        PatternId::MultiAgent => Box::new(MultiAgentStrategy::new(collab)),
        PatternId::Conversational => Box::new(ConversationalStrategy::new(collab)),
        PatternId::SelfAsk => Box::new(SelfAskStrategy::new(collab)),
    }
}

/// One interactive session: the active strategy plus the shared
/// collaborators it was built from.
pub struct SessionAgent {
    collab: Collaborators,
    strategy: Box<dyn Strategy>,
}

impl SessionAgent {
    pub fn new(pattern: PatternId, collab: Collaborators) -> Self {
        let strategy = build_strategy(pattern, collab.clone());
        Self { collab, strategy }
    }

    pub fn pattern(&self) -> PatternId {
        self.strategy.pattern()
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collab
    }

    /// Drop the current strategy and build the new pattern against the
    /// same collaborators. Cache and memory are untouched.
    pub fn switch_pattern(&mut self, pattern: PatternId) {
        info!(from = %self.strategy.pattern(), to = %pattern, "Switching agent pattern");
        self.strategy = build_strategy(pattern, self.collab.clone());
    }

    pub async fn ask(&self, query: &str) -> AgentResult {
        self.strategy.execute_query(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_helpers::{named_registry, ScriptedProvider};

    #[test]
    fn builds_every_pattern() {
        for pattern in PatternId::ALL {
            let collab = Collaborators::for_tests(
                Arc::new(ScriptedProvider::new(vec![])),
                named_registry(),
            );
            let strategy = build_strategy(pattern, collab);
            assert_eq!(strategy.pattern(), pattern);
            assert!(!strategy.prompt_template().is_empty());
        }
    }

    #[tokio::test]
    async fn switch_pattern_keeps_cache_and_memory() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Thought: t\nFinal Answer: first answer",
        ]));
        let collab = Collaborators::for_tests(provider.clone(), named_registry());
        let mut agent = SessionAgent::new(PatternId::React, collab);

        let first = agent.ask("what is up?").await;
        assert_eq!(first.output, "first answer");
        agent
            .collaborators()
            .memory
            .lock()
            .unwrap()
            .add_interaction("what is up?", &first.output, serde_json::Map::new())
            .unwrap();

        agent.switch_pattern(PatternId::Conversational);
        assert_eq!(agent.pattern(), PatternId::Conversational);

        // Cache survives the switch: same query, no new model call.
        let again = agent.ask("what is up?").await;
        assert_eq!(again.output, "first answer");
        assert_eq!(provider.calls(), 1);

        // Memory survives the switch.
        assert_eq!(agent.collaborators().memory.lock().unwrap().len(), 1);
    }
}
