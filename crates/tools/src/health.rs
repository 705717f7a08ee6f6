//! health_check — one-shot report across the core telemetry sections.

use async_trait::async_trait;
use std::sync::Arc;
use sysward_core::error::ToolError;
use sysward_core::{Collector, Tool};

/// Collects a fresh snapshot and formats the sections that speak to
/// overall host health.
pub struct HealthCheckTool {
    collector: Arc<dyn Collector>,
}

impl HealthCheckTool {
    pub fn new(collector: Arc<dyn Collector>) -> Self {
        Self { collector }
    }
}

#[async_trait]
impl Tool for HealthCheckTool {
    fn name(&self) -> &str {
        "health_check"
    }

    fn description(&self) -> &str {
        "Perform a comprehensive system health check (cpu, memory, disk, network, uptime)"
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        let snapshot = self
            .collector
            .collect()
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let mut report = Vec::new();
        for (label, body) in [
            ("CPU Status", &snapshot.cpu),
            ("Memory Status", &snapshot.memory),
            ("Disk Status", &snapshot.disk),
            ("Network Status", &snapshot.network),
            ("Uptime", &snapshot.uptime),
        ] {
            if !body.is_empty() {
                report.push(format!("{label}: {body}"));
            }
        }
        if report.is_empty() {
            return Ok("Health check could not collect any telemetry sections.".to_string());
        }
        Ok(report.join("\n\n"))
    }
}
