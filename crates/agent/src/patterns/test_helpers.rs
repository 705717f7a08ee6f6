//! Scripted doubles shared by the engine and strategy tests.
#![cfg(test)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use sysward_core::error::{ModelError, ToolError};
use sysward_core::{ModelRequest, ModelResponse, Provider, Tool, ToolRegistry};

/// Replays a fixed sequence of responses, or loops one forever.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    repeat: Option<String>,
    failures: AtomicUsize,
    calls: AtomicUsize,
    last_request: Mutex<Option<ModelRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            repeat: None,
            failures: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Returns the same response on every call.
    pub fn looping(response: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            repeat: Some(response.to_string()),
            failures: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Fails the first call, then replays `responses`.
    pub fn with_initial_error(responses: Vec<&str>) -> Self {
        let provider = Self::new(responses);
        provider.failures.store(1, Ordering::SeqCst);
        provider
    }

    /// Fails the first `n` calls, then returns `response` on every call.
    pub fn with_errors_then(n: usize, response: &str) -> Self {
        let provider = Self::looping(response);
        provider.failures.store(n, Ordering::SeqCst);
        provider
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request seen by `complete`.
    pub fn last_request(&self) -> Option<ModelRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ModelError::Network("scripted failure".to_string()));
        }
        let content = match self.responses.lock().ok().and_then(|mut q| q.pop_front()) {
            Some(c) => c,
            None => self
                .repeat
                .clone()
                .ok_or_else(|| ModelError::ApiError {
                    status_code: 500,
                    message: "script exhausted".to_string(),
                })?,
        };
        Ok(ModelResponse {
            content,
            model: "scripted".to_string(),
            usage: None,
        })
    }
}

/// Always fails with a transport error.
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
        Err(ModelError::Network("connection refused".to_string()))
    }
}

/// Echoes its input; input "fail" produces a tool error.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes back the input"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        if input == "fail" {
            return Err(ToolError::ExecutionFailed("echo refused".to_string()));
        }
        Ok(format!("echo: {input}"))
    }
}

/// A named read-only tool returning a fixed answer, for subset tests.
pub struct FixedTool {
    pub tool_name: &'static str,
    pub answer: &'static str,
}

#[async_trait]
impl Tool for FixedTool {
    fn name(&self) -> &str {
        self.tool_name
    }

    fn description(&self) -> &str {
        "Returns a fixed answer"
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        Ok(self.answer.to_string())
    }
}

/// Registry with the production tool names, all backed by fixed answers.
pub fn named_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    for name in [
        "knowledge_query",
        "live_metrics",
        "system_action",
        "external_lookup",
        "health_check",
        "security_scan",
    ] {
        registry.register(Arc::new(FixedTool {
            tool_name: name,
            answer: "fixed",
        }));
    }
    Arc::new(registry)
}
