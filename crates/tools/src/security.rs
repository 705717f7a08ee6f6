//! security_scan — basic host security assessment.

use async_trait::async_trait;
use sysward_core::error::ToolError;
use sysward_core::Tool;
use sysward_exec::CommandRunner;

/// Three read-only probes: security services, listening sockets, and
/// recent authentication log entries. A probe that fails contributes a
/// note rather than failing the scan.
pub struct SecurityScanTool {
    runner: CommandRunner,
}

impl SecurityScanTool {
    pub fn new() -> Self {
        Self {
            runner: CommandRunner::new(),
        }
    }

    async fn probe(&self, command: &str) -> String {
        match self.runner.run(command).await {
            Ok(out) if out.success && !out.stdout.trim().is_empty() => {
                out.stdout.trim().to_string()
            }
            Ok(_) => "not available".to_string(),
            Err(e) => format!("probe failed: {e}"),
        }
    }
}

impl Default for SecurityScanTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SecurityScanTool {
    fn name(&self) -> &str {
        "security_scan"
    }

    fn description(&self) -> &str {
        "Perform a basic security assessment (security services, open ports, recent auth events)"
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        let services = self
            .probe("ps -eo comm | grep -iE 'firewalld|ufw|fail2ban|sshd|auditd' | sort -u")
            .await;
        let ports = self.probe("ss -tuln | head -n 20").await;
        let auth_events = self
            .probe("tail -n 10 /var/log/auth.log 2>/dev/null || journalctl -q -n 10 _COMM=sshd 2>/dev/null")
            .await;

        Ok(format!(
            "Security Services: {services}\n\nOpen Ports: {ports}\n\nRecent Security Events: {auth_events}"
        ))
    }
}
