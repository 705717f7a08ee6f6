//! Plan-then-Execute strategy: same loop, planning prompt, 2x budget.

use async_trait::async_trait;
use sysward_core::{AgentResult, PatternId};

use crate::engine::{PromptTemplate, ReasoningLoop};
use crate::factory::Collaborators;
use crate::patterns::{cached, Strategy};

pub(crate) const PLAN_EXECUTE_SYSTEM: &str = "You are sysward, a system administration assistant. \
Work in two phases. First, in your initial Thought, write a short numbered plan of the steps \
needed to answer the question. Then execute the plan one step at a time, using one tool per \
step and revising the plan if an Observation contradicts it. Give the Final Answer only after \
the plan is complete.";

pub struct PlanExecuteStrategy {
    collab: Collaborators,
    template: PromptTemplate,
}

impl PlanExecuteStrategy {
    pub fn new(collab: Collaborators) -> Self {
        Self {
            collab,
            template: PromptTemplate::new(PLAN_EXECUTE_SYSTEM),
        }
    }
}

#[async_trait]
impl Strategy for PlanExecuteStrategy {
    fn pattern(&self) -> PatternId {
        PatternId::PlanExecute
    }

    fn prompt_template(&self) -> &str {
        &self.template.system
    }

    async fn execute_query(&self, query: &str) -> AgentResult {
        cached(&self.collab.cache, query, async {
            // Planning turns consume iterations, so the budget doubles.
            let engine = ReasoningLoop::new(
                self.collab.provider.clone(),
                self.collab.model.clone(),
                self.collab.max_iterations * 2,
            )
            .with_sampling(self.collab.temperature, self.collab.max_tokens);
            engine
                .run(query, &self.collab.tools.all(), &self.template)
                .await
        })
        .await
    }
}
