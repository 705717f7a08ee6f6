//! Multi-specialist strategy: classify, fan out, synthesize.
//!
//! Specialist tool subsets are computed once at construction and never
//! change. Fan-out runs the selected specialists concurrently; the
//! coordinator is a strict barrier and runs even when every specialist
//! failed.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{Map, Value};
use std::sync::Arc;
use sysward_core::{AgentResult, PatternId, Tool};
use tracing::{debug, warn};

use crate::engine::{PromptTemplate, ReasoningLoop};
use crate::factory::Collaborators;
use crate::patterns::{cached, Strategy};

pub(crate) const MULTI_AGENT_SYSTEM: &str = "You are sysward's coordination layer, \
combining the findings of specialist agents into one answer.";

const COORDINATOR_SYSTEM: &str = "You are the coordinator of a team of system administration \
specialists. You are given the original question and each specialist's findings. Synthesize \
them into one coherent, non-repetitive answer. If the findings conflict, say so and weigh \
them. If no findings are available, answer from general knowledge and say the specialists \
could not contribute.";

/// Focused loops get a small fixed budget.
const SPECIALIST_BUDGET: usize = 5;
const COORDINATOR_BUDGET: usize = 3;

struct Specialist {
    name: &'static str,
    system: &'static str,
    keywords: &'static [&'static str],
    tools: Vec<Arc<dyn Tool>>,
}

pub struct MultiAgentStrategy {
    collab: Collaborators,
    specialists: Vec<Specialist>,
}

impl MultiAgentStrategy {
    pub fn new(collab: Collaborators) -> Self {
        let performance_tools = collab
            .tools
            .subset(|n| matches!(n, "knowledge_query" | "live_metrics" | "health_check"));
        let security_tools = collab
            .tools
            .subset(|n| matches!(n, "system_action" | "external_lookup" | "security_scan"));
        let troubleshooting_tools = collab.tools.all();

        let specialists = vec![
            Specialist {
                name: "performance",
                system: "You are a system performance specialist: resource monitoring, \
                         bottleneck analysis, and optimization. Focus only on performance \
                         aspects of the question.",
                keywords: &["cpu", "memory", "disk", "performance", "slow", "usage", "resource"],
                tools: performance_tools,
            },
            Specialist {
                name: "security",
                system: "You are a system security specialist: vulnerability assessment, \
                         hardening, and security best practices. Focus only on security \
                         aspects of the question.",
                keywords: &["security", "vulnerability", "firewall", "malware", "attack", "breach"],
                tools: security_tools,
            },
            Specialist {
                name: "troubleshooting",
                system: "You are a troubleshooting specialist: diagnosing errors, tracing \
                         root causes, and proposing fixes. Focus on diagnosing and resolving \
                         the problem in the question.",
                keywords: &["error", "problem", "issue", "fix", "troubleshoot", "debug", "crash"],
                tools: troubleshooting_tools,
            },
        ];

        Self { collab, specialists }
    }

    /// Keyword classification. Zero matches selects everyone, so an
    /// unclassifiable query is never under-consulted.
    fn select(&self, query: &str) -> Vec<&Specialist> {
        let q = query.to_lowercase();
        let matched: Vec<&Specialist> = self
            .specialists
            .iter()
            .filter(|s| s.keywords.iter().any(|k| q.contains(k)))
            .collect();
        if matched.is_empty() {
            self.specialists.iter().collect()
        } else {
            matched
        }
    }

    #[cfg(test)]
    fn selected_names(&self, query: &str) -> Vec<&'static str> {
        self.select(query).iter().map(|s| s.name).collect()
    }
}

#[async_trait]
impl Strategy for MultiAgentStrategy {
    fn pattern(&self) -> PatternId {
        PatternId::MultiAgent
    }

    fn prompt_template(&self) -> &str {
        MULTI_AGENT_SYSTEM
    }

    async fn execute_query(&self, query: &str) -> AgentResult {
        cached(&self.collab.cache, query, async {
            let selected = self.select(query);
            debug!(
                specialists = ?selected.iter().map(|s| s.name).collect::<Vec<_>>(),
                "Fanning out to specialists"
            );

            // Fan-out: independent loops, no short-circuiting.
            let runs = selected.iter().map(|specialist| async {
                let engine = ReasoningLoop::new(
                    self.collab.provider.clone(),
                    self.collab.model.clone(),
                    SPECIALIST_BUDGET,
                )
                .with_sampling(self.collab.temperature, self.collab.max_tokens);
                let template = PromptTemplate::new(specialist.system);
                let result = engine.run(query, &specialist.tools, &template).await;
                (specialist.name, result)
            });
            let outcomes = join_all(runs).await;

            // Failed specialists are omitted from synthesis entirely.
            let mut contributions = Map::new();
            let mut labeled = String::new();
            for (name, result) in &outcomes {
                if result.error {
                    warn!(specialist = name, "Specialist failed, omitting from synthesis");
                    continue;
                }
                contributions.insert(name.to_string(), Value::String(result.output.clone()));
                labeled.push_str(&format!("[{name}]\n{}\n\n", result.output));
            }
            if labeled.is_empty() {
                labeled.push_str("(no specialist responses available)\n");
            }

            // Fan-in: zero-tool coordinator pass after all have settled.
            let coordinator_query = format!(
                "Original question: {query}\n\nSpecialist findings:\n{labeled}\
                 Synthesize these into one answer to the original question."
            );
            let engine = ReasoningLoop::new(
                self.collab.provider.clone(),
                self.collab.model.clone(),
                COORDINATOR_BUDGET,
            )
            .with_sampling(self.collab.temperature, self.collab.max_tokens);
            let result = engine
                .run(
                    &coordinator_query,
                    &[],
                    &PromptTemplate::new(COORDINATOR_SYSTEM),
                )
                .await;
            if result.error {
                return result;
            }

            result
                .with_extra("specialists", Value::Object(contributions))
                .with_extra("coordination_used", Value::Bool(true))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_helpers::{named_registry, ScriptedProvider};

    fn strategy(provider: Arc<ScriptedProvider>) -> MultiAgentStrategy {
        MultiAgentStrategy::new(Collaborators::for_tests(provider, named_registry()))
    }

    #[test]
    fn keyword_selection() {
        let s = strategy(Arc::new(ScriptedProvider::new(vec![])));
        assert_eq!(s.selected_names("my cpu is slow"), vec!["performance"]);
        assert_eq!(
            s.selected_names("is there a firewall breach?"),
            vec!["security"]
        );
        assert_eq!(
            s.selected_names("fix this crash please"),
            vec!["troubleshooting"]
        );
        assert_eq!(
            s.selected_names("slow disk after the malware error"),
            vec!["performance", "security", "troubleshooting"]
        );
    }

    #[test]
    fn zero_matches_selects_all_three() {
        let s = strategy(Arc::new(ScriptedProvider::new(vec![])));
        assert_eq!(
            s.selected_names("tell me about this machine"),
            vec!["performance", "security", "troubleshooting"]
        );
    }

    #[test]
    fn subsets_are_fixed_at_construction() {
        let s = strategy(Arc::new(ScriptedProvider::new(vec![])));
        let perf: Vec<&str> = s.specialists[0].tools.iter().map(|t| t.name()).collect();
        assert_eq!(perf, vec!["knowledge_query", "live_metrics", "health_check"]);
        let sec: Vec<&str> = s.specialists[1].tools.iter().map(|t| t.name()).collect();
        assert_eq!(sec, vec!["system_action", "external_lookup", "security_scan"]);
        assert_eq!(s.specialists[2].tools.len(), 6);
    }

    #[tokio::test]
    async fn single_specialist_plus_coordinator() {
        // One specialist (performance) answers, then the coordinator.
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Thought: done\nFinal Answer: cpu is at 9%",
            "Thought: combining\nFinal Answer: overall the machine is healthy",
        ]));
        let s = strategy(provider.clone());
        let result = s.execute_query("how is my cpu usage?").await;
        assert!(!result.error);
        assert_eq!(result.output, "overall the machine is healthy");
        assert!(result
            .extra
            .get("coordination_used")
            .and_then(Value::as_bool)
            .unwrap());
        let specialists = result.extra.get("specialists").unwrap().as_object().unwrap();
        assert_eq!(
            specialists.get("performance").unwrap().as_str().unwrap(),
            "cpu is at 9%"
        );
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn failed_specialists_are_omitted_but_coordinator_still_runs() {
        // All three specialists selected and all three fail; the
        // coordinator still gets a turn.
        let provider = Arc::new(ScriptedProvider::with_errors_then(
            3,
            "Thought: nothing came in\nFinal Answer: best-effort answer",
        ));
        let s = strategy(provider.clone());
        let result = s.execute_query("tell me about this machine").await;
        assert!(!result.error);
        assert_eq!(result.output, "best-effort answer");
        assert!(result
            .extra
            .get("specialists")
            .unwrap()
            .as_object()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn one_failed_specialist_does_not_drop_the_others() {
        // Performance fails on its model call; security and
        // troubleshooting still contribute to the synthesis.
        let provider = Arc::new(ScriptedProvider::with_initial_error(vec![
            "Thought: done\nFinal Answer: sockets look clean",
            "Thought: done\nFinal Answer: no crashes in the logs",
            "Thought: combine\nFinal Answer: machine is healthy overall",
        ]));
        let s = strategy(provider);
        let result = s.execute_query("tell me about this machine").await;
        assert!(!result.error);
        assert_eq!(result.output, "machine is healthy overall");
        let specialists = result.extra.get("specialists").unwrap().as_object().unwrap();
        assert_eq!(specialists.len(), 2);
        assert!(specialists.contains_key("security"));
        assert!(specialists.contains_key("troubleshooting"));
        assert!(!specialists.contains_key("performance"));
        assert!(result
            .extra
            .get("coordination_used")
            .and_then(Value::as_bool)
            .unwrap());
    }

    #[tokio::test]
    async fn coordinator_failure_is_an_error() {
        // Specialist succeeds, coordinator transport fails.
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Thought: done\nFinal Answer: cpu fine",
        ]));
        let s = strategy(provider);
        let result = s.execute_query("cpu?").await;
        assert!(result.error);
        assert!(result.output.starts_with("Error executing query:"));
    }
}
