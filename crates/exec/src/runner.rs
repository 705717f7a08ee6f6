//! Shell command execution with an enforced timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use sysward_core::error::ExecError;
use tokio::process::Command;
use tracing::{debug, warn};

/// Hard ceiling on command runtime.
pub const COMMAND_TIMEOUT_SECS: u64 = 30;

/// The outcome of one command invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Runs shell commands through `sh -c` with a 30-second timeout.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Execute a command. A timeout is an [`ExecError::Timeout`];
    /// a non-zero exit is a successful run with `success=false`.
    pub async fn run(&self, command: &str) -> Result<CommandOutput, ExecError> {
        debug!(command = %command, "Executing command");

        let mut shell = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };

        let output = tokio::time::timeout(Duration::from_secs(COMMAND_TIMEOUT_SECS), shell.output())
            .await
            .map_err(|_| {
                warn!(command = %command, "Command timed out");
                ExecError::Timeout {
                    command: command.to_string(),
                    timeout_secs: COMMAND_TIMEOUT_SECS,
                }
            })?
            .map_err(|e| ExecError::Spawn(e.to_string()))?;

        let exit_code = output.status.code().unwrap_or(-1);
        if !output.status.success() {
            warn!(command = %command, exit_code, "Command failed");
        }

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_command_captures_stdout() {
        let runner = CommandRunner::new();
        let out = runner.run("echo hello").await.unwrap();
        assert!(out.success);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn failing_command_reports_exit_code() {
        let runner = CommandRunner::new();
        let out = runner.run("exit 3").await.unwrap();
        assert!(!out.success);
        assert_eq!(out.exit_code, 3);
    }

    #[tokio::test]
    async fn stderr_is_captured() {
        let runner = CommandRunner::new();
        let out = runner.run("echo oops >&2").await.unwrap();
        assert!(out.stderr.contains("oops"));
    }
}
