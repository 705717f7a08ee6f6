//! Agent pattern identifiers.
//!
//! A closed enumeration of the orchestration strategies the factory can
//! build. Kept in core so the config crate and the CLI can name
//! patterns without depending on the agent crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One interchangeable agent-orchestration strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    /// Reasoning + Acting: thinks step by step and uses tools iteratively.
    React,
    /// Plan then Execute: creates a plan first, then executes each step.
    PlanExecute,
    /// Multiple Specialists: specialized agents working together.
    MultiAgent,
    /// Conversational: maintains context and memory across interactions.
    Conversational,
    /// Self-Ask: breaks down complex questions into sub-questions.
    SelfAsk,
}

impl PatternId {
    /// All patterns, in display order.
    pub const ALL: [PatternId; 5] = [
        PatternId::React,
        PatternId::PlanExecute,
        PatternId::MultiAgent,
        PatternId::Conversational,
        PatternId::SelfAsk,
    ];

    /// One-line description shown by the `patterns` command.
    pub fn description(&self) -> &'static str {
        match self {
            PatternId::React => {
                "Reasoning + Acting: thinks step by step and uses tools iteratively"
            }
            PatternId::PlanExecute => {
                "Plan then Execute: creates a plan first, then executes each step"
            }
            PatternId::MultiAgent => {
                "Multiple Specialists: uses specialized agents working together"
            }
            PatternId::Conversational => {
                "Conversational: maintains context and memory across interactions"
            }
            PatternId::SelfAsk => {
                "Self-Ask: breaks down complex questions into sub-questions"
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternId::React => "react",
            PatternId::PlanExecute => "plan_execute",
            PatternId::MultiAgent => "multi_agent",
            PatternId::Conversational => "conversational",
            PatternId::SelfAsk => "self_ask",
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternId {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "react" => Ok(PatternId::React),
            "plan_execute" | "plan-execute" => Ok(PatternId::PlanExecute),
            "multi_agent" | "multi-agent" => Ok(PatternId::MultiAgent),
            "conversational" => Ok(PatternId::Conversational),
            "self_ask" | "self-ask" => Ok(PatternId::SelfAsk),
            other => Err(crate::error::Error::Config {
                message: format!(
                    "unknown agent pattern: '{}' (expected one of: react, plan_execute, multi_agent, conversational, self_ask)",
                    other
                ),
            }),
        }
    }
}
