//! live_metrics — real-time telemetry reads and safe command execution.

use async_trait::async_trait;
use std::sync::Arc;
use sysward_core::error::ToolError;
use sysward_core::{Collector, Tool};
use sysward_exec::{CommandRunner, ExecPolicy};
use tracing::debug;

/// Answers topic requests (cpu, memory, disk, ...) from a fresh
/// snapshot; anything else is treated as a read-only command and run
/// through the safe-mode whitelist.
pub struct LiveMetricsTool {
    collector: Arc<dyn Collector>,
    runner: CommandRunner,
    policy: ExecPolicy,
}

impl LiveMetricsTool {
    pub fn new(collector: Arc<dyn Collector>, policy: ExecPolicy) -> Self {
        Self {
            collector,
            runner: CommandRunner::new(),
            policy,
        }
    }
}

#[async_trait]
impl Tool for LiveMetricsTool {
    fn name(&self) -> &str {
        "live_metrics"
    }

    fn description(&self) -> &str {
        "Get real-time system information (cpu, memory, disk, processes, network, temperature, battery, uptime) or run a whitelisted read-only command"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let snapshot = self
            .collector
            .collect()
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if let Some(section) = snapshot.section(input) {
            debug!(topic = %input, "Answered from telemetry snapshot");
            return Ok(section.to_string());
        }

        // Not a known topic: treat the input as a command.
        let command = self
            .policy
            .check(input)
            .map_err(|e| ToolError::PermissionDenied(e.to_string()))?;
        let output = self
            .runner
            .run(command)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        if output.success {
            Ok(output.stdout)
        } else {
            Ok(format!("Command failed: {}", output.stderr))
        }
    }
}
