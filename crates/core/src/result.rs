//! The normalized result every agent strategy returns.
//!
//! Failures never cross the strategy boundary as raised errors: a
//! strategy that hits a model outage, a bad pattern response, or a tool
//! crash still hands back one `AgentResult`, with `error=true` and the
//! cause folded into `output`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One think/act/observe step recorded by a reasoning loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// The model's free-form reasoning for this step.
    pub thought: String,

    /// The tool the model chose, if it acted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// The input it gave that tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_input: Option<String>,

    /// What came back from the tool (or the recovery note).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl ReasoningStep {
    /// Render a one-line summary, used for the `steps` list shown to users.
    pub fn summary(&self) -> String {
        match (&self.action, &self.observation) {
            (Some(action), Some(obs)) => {
                format!(
                    "{} -> {}({}) => {}",
                    truncate(&self.thought, 80),
                    action,
                    truncate(self.action_input.as_deref().unwrap_or(""), 40),
                    truncate(obs, 80)
                )
            }
            (Some(action), None) => format!("{} -> {}", truncate(&self.thought, 80), action),
            _ => truncate(&self.thought, 160),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    }
}

/// The normalized result of one query, from any strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// The answer text (or the error message when `error` is set).
    pub output: String,

    /// True when `output` communicates a failure.
    #[serde(default)]
    pub error: bool,

    /// The reasoning trace, when the strategy ran a loop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<ReasoningStep>>,

    /// Strategy-specific extras (early-stop marker, specialist outputs, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl AgentResult {
    /// A successful answer with no trace.
    pub fn answer(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: false,
            trace: None,
            extra: Map::new(),
        }
    }

    /// A failure result in the canonical "Error executing query" shape.
    pub fn failure(cause: impl std::fmt::Display) -> Self {
        Self {
            output: format!("Error executing query: {cause}"),
            error: true,
            trace: None,
            extra: Map::new(),
        }
    }

    /// Attach a key to `extra` (builder style).
    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Whether the loop stopped on budget exhaustion rather than a final answer.
    pub fn stopped_early(&self) -> bool {
        self.extra
            .get("stopped_early")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_has_canonical_prefix() {
        let r = AgentResult::failure("connection refused");
        assert!(r.error);
        assert_eq!(r.output, "Error executing query: connection refused");
    }

    #[test]
    fn stopped_early_marker() {
        let r = AgentResult::answer("partial").with_extra("stopped_early", Value::Bool(true));
        assert!(r.stopped_early());
        assert!(!AgentResult::answer("done").stopped_early());
    }

    #[test]
    fn step_summary_truncates() {
        let step = ReasoningStep {
            thought: "x".repeat(200),
            action: None,
            action_input: None,
            observation: None,
        };
        assert!(step.summary().chars().count() <= 161);
    }

    #[test]
    fn step_summary_includes_action() {
        let step = ReasoningStep {
            thought: "check cpu".into(),
            action: Some("live_metrics".into()),
            action_input: Some("cpu usage".into()),
            observation: Some("CPU Usage: 12%".into()),
        };
        let s = step.summary();
        assert!(s.contains("live_metrics"));
        assert!(s.contains("CPU Usage"));
    }
}
