//! system_action — state-changing commands behind a confirmation gate.

use async_trait::async_trait;
use std::sync::Arc;
use sysward_core::error::ToolError;
use sysward_core::{SafetyClass, Tool};
use sysward_exec::{CommandRunner, Confirmer};
use tracing::{info, warn};

/// Runs commands that modify the host. Each invocation blocks on an
/// interactive yes/no unless the confirmation requirement is disabled
/// in config.
pub struct SystemActionTool {
    runner: CommandRunner,
    confirmer: Arc<dyn Confirmer>,
    require_confirmation: bool,
}

impl SystemActionTool {
    pub fn new(confirmer: Arc<dyn Confirmer>, require_confirmation: bool) -> Self {
        Self {
            runner: CommandRunner::new(),
            confirmer,
            require_confirmation,
        }
    }
}

#[async_trait]
impl Tool for SystemActionTool {
    fn name(&self) -> &str {
        "system_action"
    }

    fn description(&self) -> &str {
        "Execute a system-level command that modifies the host (requires user confirmation)"
    }

    fn safety_class(&self) -> SafetyClass {
        SafetyClass::Mutating
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        if self.require_confirmation {
            let prompt = format!(
                "SYSTEM ACTION REQUESTED\nCommand: {input}\nThis command will modify your system. Proceed?"
            );
            if !self.confirmer.confirm(&prompt).await {
                info!(command = %input, "System action cancelled by user");
                return Ok("System action cancelled by user.".to_string());
            }
        }

        warn!(command = %input, "Executing system action");
        let output = self
            .runner
            .run(input)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        if output.success {
            Ok(format!("Command executed successfully:\n{}", output.stdout))
        } else {
            Ok(format!("Command failed:\n{}", output.stderr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysward_exec::FixedConfirmer;

    #[tokio::test]
    async fn declined_confirmation_cancels_without_running() {
        let dir = std::env::temp_dir().join("sysward-action-test-decline");
        let _ = std::fs::remove_dir_all(&dir);
        let tool = SystemActionTool::new(Arc::new(FixedConfirmer(false)), true);
        let out = tool
            .invoke(&format!("mkdir -p {}", dir.display()))
            .await
            .unwrap();
        assert!(out.contains("cancelled"));
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn confirmed_action_runs() {
        let tool = SystemActionTool::new(Arc::new(FixedConfirmer(true)), true);
        let out = tool.invoke("true").await.unwrap();
        assert!(out.contains("executed successfully"));
    }

    #[tokio::test]
    async fn override_skips_the_gate() {
        // Confirmer would say no, but the gate is disabled.
        let tool = SystemActionTool::new(Arc::new(FixedConfirmer(false)), false);
        let out = tool.invoke("true").await.unwrap();
        assert!(out.contains("executed successfully"));
    }

    #[test]
    fn is_classified_mutating() {
        let tool = SystemActionTool::new(Arc::new(FixedConfirmer(true)), true);
        assert_eq!(tool.safety_class(), SafetyClass::Mutating);
    }
}
