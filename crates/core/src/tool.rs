//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what give the assistant the ability to act on the host:
//! query indexed system data, read live telemetry, run commands, look
//! up external knowledge. Each tool carries a safety classification so
//! the execution policy knows whether a confirmation gate applies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ToolError;

/// Whether a tool only observes the system or can modify it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyClass {
    /// Observational — never changes host state.
    ReadOnly,
    /// Can change host state; requires interactive confirmation unless
    /// the global override is set.
    Mutating,
}

/// The core Tool trait.
///
/// Each tool (knowledge_query, live_metrics, system_action, ...)
/// implements this trait. Tools are registered in the ToolRegistry and
/// made available to the reasoning loop, which addresses them by name
/// from the model's `Action:` line.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "live_metrics").
    fn name(&self) -> &str;

    /// A description of what this tool does (rendered into the prompt).
    fn description(&self) -> &str;

    /// Whether this tool can modify the host.
    fn safety_class(&self) -> SafetyClass {
        SafetyClass::ReadOnly
    }

    /// Execute the tool with the given free-text input.
    async fn invoke(&self, input: &str) -> std::result::Result<String, ToolError>;
}

/// A registry of available tools.
///
/// Built once at session start and shared read-only by all strategies.
/// The reasoning loop uses it to render the tool catalogue into prompts
/// and to dispatch `Action:` lines.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    // Registration order, so catalogues render deterministically.
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// All tools in registration order.
    pub fn all(&self) -> Vec<Arc<dyn Tool>> {
        self.order
            .iter()
            .filter_map(|n| self.tools.get(n).cloned())
            .collect()
    }

    /// The subset of tools whose names satisfy `pred`, in registration order.
    pub fn subset(&self, pred: impl Fn(&str) -> bool) -> Vec<Arc<dyn Tool>> {
        self.order
            .iter()
            .filter(|n| pred(n))
            .filter_map(|n| self.tools.get(n).cloned())
            .collect()
    }

    /// List all registered tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Execute a tool by name.
    pub async fn invoke(
        &self,
        name: &str,
        input: &str,
    ) -> std::result::Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.invoke(input).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a `name: description` catalogue line per tool, for prompts.
pub fn catalogue(tools: &[Arc<dyn Tool>]) -> String {
    tools
        .iter()
        .map(|t| format!("{}: {}", t.name(), t.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a comma-separated list of tool names, for prompts.
pub fn tool_names(tools: &[Arc<dyn Tool>]) -> String {
    tools
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}
