//! Safe-mode command whitelist.

use sysward_core::error::ExecError;
use tracing::debug;

/// Gatekeeper for free-form commands. In safe mode only commands whose
/// first word appears in the whitelist are allowed through.
#[derive(Debug, Clone)]
pub struct ExecPolicy {
    safe_mode: bool,
    allowed: Vec<String>,
}

impl ExecPolicy {
    pub fn new(safe_mode: bool, allowed: Vec<String>) -> Self {
        Self { safe_mode, allowed }
    }

    /// Allow everything. Used for trusted internal collection commands.
    pub fn permissive() -> Self {
        Self {
            safe_mode: false,
            allowed: Vec::new(),
        }
    }

    pub fn safe_mode(&self) -> bool {
        self.safe_mode
    }

    /// Check a command against the policy. Returns the command unchanged
    /// when allowed, or a descriptive [`ExecError::Rejected`] otherwise.
    pub fn check<'a>(&self, command: &'a str) -> Result<&'a str, ExecError> {
        if !self.safe_mode {
            return Ok(command);
        }

        let first = command.split_whitespace().next().unwrap_or("");
        if first.is_empty() {
            return Err(ExecError::Rejected("empty command".to_string()));
        }

        if self.allowed.iter().any(|a| a == first) {
            debug!(command = %command, "Command allowed by policy");
            Ok(command)
        } else {
            Err(ExecError::Rejected(format!(
                "command '{}' is not in the safe-mode whitelist (allowed: {})",
                first,
                self.allowed.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ExecPolicy {
        ExecPolicy::new(
            true,
            vec!["ps".to_string(), "df".to_string(), "uptime".to_string()],
        )
    }

    #[test]
    fn whitelisted_command_passes() {
        assert!(policy().check("df -h").is_ok());
    }

    #[test]
    fn unlisted_command_is_rejected_with_reason() {
        let err = policy().check("rm -rf /tmp/x").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rm"));
        assert!(msg.contains("whitelist"));
    }

    #[test]
    fn safe_mode_off_allows_anything() {
        let p = ExecPolicy::new(false, Vec::new());
        assert!(p.check("arbitrary --flags").is_ok());
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(policy().check("   ").is_err());
    }
}
