//! The bounded think/act/observe loop every strategy drives.

use std::collections::HashMap;
use std::sync::Arc;
use serde_json::Value;
use sysward_core::tool::{catalogue, tool_names};
use sysward_core::{
    AgentResult, Message, ModelRequest, Provider, ReasoningStep, Tool,
};
use tracing::{debug, warn};

use crate::parser::{parse_response, Parsed};

/// The pattern-specific pieces of the rendered prompt.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// System instructions (the pattern's voice and procedure).
    pub system: String,

    /// Optional prior-turns context injected before the question.
    pub context: Option<String>,
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Render the full user prompt: tool catalogue, answer format,
    /// optional context, the question, and the scratchpad so far.
    fn render(&self, query: &str, tools: &[Arc<dyn Tool>], trace: &[ReasoningStep]) -> String {
        let mut prompt = String::new();

        if tools.is_empty() {
            prompt.push_str(
                "Answer directly. End your response with:\n\nFinal Answer: <your answer>\n\n",
            );
        } else {
            prompt.push_str("You have access to the following tools:\n\n");
            prompt.push_str(&catalogue(tools));
            prompt.push_str(&format!(
                "\n\nUse the following format:\n\n\
                 Thought: what you are thinking about the current situation\n\
                 Action: the tool to use, one of [{}]\n\
                 Action Input: the input to the tool\n\
                 Observation: the result of the tool (provided to you)\n\
                 ... (Thought/Action/Action Input/Observation can repeat)\n\
                 Thought: I now know the final answer\n\
                 Final Answer: the answer to the original question\n\n",
                tool_names(tools)
            ));
        }

        if let Some(context) = &self.context {
            prompt.push_str(context);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!("Question: {query}\n"));
        for step in trace {
            prompt.push_str(&format!("Thought: {}\n", step.thought));
            if let Some(action) = &step.action {
                prompt.push_str(&format!("Action: {action}\n"));
                prompt.push_str(&format!(
                    "Action Input: {}\n",
                    step.action_input.as_deref().unwrap_or("")
                ));
            }
            if let Some(observation) = &step.observation {
                prompt.push_str(&format!("Observation: {observation}\n"));
            }
        }
        prompt
    }
}

/// Drives the model/tool loop until a final answer or budget exhaustion.
pub struct ReasoningLoop {
    provider: Arc<dyn Provider>,
    model: String,
    max_iterations: usize,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ReasoningLoop {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, max_iterations: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            max_iterations,
            temperature: 0.1,
            max_tokens: None,
        }
    }

    /// Override the request sampling settings.
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run the loop. Model transport errors produce `error=true`; every
    /// other failure mode (unknown action, malformed response, tool
    /// error) is folded into an observation and the loop continues.
    pub async fn run(
        &self,
        query: &str,
        tools: &[Arc<dyn Tool>],
        template: &PromptTemplate,
    ) -> AgentResult {
        let by_name: HashMap<&str, &Arc<dyn Tool>> =
            tools.iter().map(|t| (t.name(), t)).collect();
        let mut trace: Vec<ReasoningStep> = Vec::new();

        for iteration in 1..=self.max_iterations {
            let prompt = template.render(query, tools, &trace);
            let mut request = ModelRequest::new(
                self.model.clone(),
                vec![
                    Message::system(template.system.clone()),
                    Message::user(prompt),
                ],
            );
            request.stop = vec!["Observation:".to_string()];
            request.temperature = self.temperature;
            request.max_tokens = self.max_tokens;

            let response = match self.provider.complete(request).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, iteration, "Model call failed");
                    return AgentResult::failure(e);
                }
            };

            match parse_response(&response.content) {
                Parsed::Final { thought, answer } => {
                    debug!(iteration, "Final answer reached");
                    trace.push(ReasoningStep {
                        thought,
                        action: None,
                        action_input: None,
                        observation: None,
                    });
                    return finish(answer, trace, false);
                }
                Parsed::Continue {
                    thought,
                    action,
                    input,
                } => {
                    let observation = match by_name.get(action.as_str()) {
                        Some(tool) => match tool.invoke(&input).await {
                            Ok(output) => output,
                            Err(e) => format!("Tool error: {e}"),
                        },
                        None => format!(
                            "Invalid action: '{}' is not an available tool. Available tools: {}",
                            action,
                            tool_names(tools)
                        ),
                    };
                    debug!(iteration, action = %action, "Tool step completed");
                    trace.push(ReasoningStep {
                        thought,
                        action: Some(action),
                        action_input: Some(input),
                        observation: Some(observation),
                    });
                }
                Parsed::Malformed => {
                    debug!(iteration, "Malformed response, recording recovery observation");
                    trace.push(ReasoningStep {
                        thought: response.content.trim().to_string(),
                        action: None,
                        action_input: None,
                        observation: Some(
                            "Invalid response format. Reply with Thought/Action/Action Input \
                             or a Final Answer."
                                .to_string(),
                        ),
                    });
                }
            }
        }

        warn!(max_iterations = self.max_iterations, "Iteration budget exhausted");
        let partial = trace
            .iter()
            .rev()
            .find_map(|s| s.observation.clone().filter(|o| !o.is_empty()))
            .unwrap_or_else(|| "No conclusive answer was reached.".to_string());
        finish(
            format!("Stopped before reaching a final answer. Best available information: {partial}"),
            trace,
            true,
        )
    }
}

fn finish(output: String, trace: Vec<ReasoningStep>, stopped_early: bool) -> AgentResult {
    let steps: Vec<Value> = trace.iter().map(|s| Value::String(s.summary())).collect();
    let mut result = AgentResult::answer(output).with_extra("steps", Value::Array(steps));
    if stopped_early {
        result = result.with_extra("stopped_early", Value::Bool(true));
    }
    result.trace = Some(trace);
    result
}
