//! Snapshot collection by shelling out to standard platform utilities.

use async_trait::async_trait;
use chrono::Utc;
use sysward_core::{Collector, Error, SystemSnapshot};
use sysward_exec::CommandRunner;
use tracing::{debug, warn};

/// Produces [`SystemSnapshot`]s by running the usual read-only system
/// utilities for the host platform. A section whose command fails stays
/// empty rather than failing the whole snapshot.
pub struct CommandCollector {
    runner: CommandRunner,
    platform: &'static str,
}

impl CommandCollector {
    pub fn new() -> Self {
        let platform = if cfg!(target_os = "macos") {
            "darwin"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else {
            "linux"
        };
        Self {
            runner: CommandRunner::new(),
            platform,
        }
    }

    /// Run one section command, returning its stdout or an empty string.
    async fn capture(&self, label: &str, command: &str) -> String {
        match self.runner.run(command).await {
            Ok(out) if out.success => out.stdout.trim().to_string(),
            Ok(out) => {
                warn!(section = label, exit_code = out.exit_code, "Section command failed");
                String::new()
            }
            Err(e) => {
                warn!(section = label, error = %e, "Section command errored");
                String::new()
            }
        }
    }

    fn commands(&self) -> [(&'static str, &'static str); 8] {
        match self.platform {
            "darwin" => [
                ("cpu", "top -l 1 | head -n 12"),
                ("memory", "vm_stat"),
                ("disk", "df -h"),
                ("processes", "ps aux -r | head -n 12"),
                ("network", "netstat -ib | head -n 12"),
                ("thermal", "pmset -g therm"),
                ("battery", "pmset -g batt"),
                ("uptime", "uptime"),
            ],
            _ => [
                ("cpu", "top -bn1 | head -n 12"),
                ("memory", "free -h"),
                ("disk", "df -h"),
                ("processes", "ps aux --sort=-%cpu | head -n 12"),
                ("network", "ss -s"),
                ("thermal", "cat /sys/class/thermal/thermal_zone*/temp 2>/dev/null"),
                (
                    "battery",
                    "cat /sys/class/power_supply/BAT*/capacity 2>/dev/null",
                ),
                ("uptime", "uptime"),
            ],
        }
    }
}

impl Default for CommandCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Collector for CommandCollector {
    fn platform(&self) -> &str {
        self.platform
    }

    async fn collect(&self) -> Result<SystemSnapshot, Error> {
        debug!(platform = self.platform, "Collecting system snapshot");

        let cmds = self.commands();
        let outputs =
            futures::future::join_all(cmds.iter().map(|(label, cmd)| self.capture(label, cmd)))
                .await;

        let mut snapshot = SystemSnapshot {
            timestamp: Utc::now(),
            platform: self.platform.to_string(),
            ..Default::default()
        };
        for ((label, _), output) in cmds.iter().zip(outputs) {
            match *label {
                "cpu" => snapshot.cpu = output,
                "memory" => snapshot.memory = output,
                "disk" => snapshot.disk = output,
                "processes" => snapshot.processes = output,
                "network" => snapshot.network = output,
                "thermal" => snapshot.thermal = output,
                "battery" => snapshot.battery = output,
                "uptime" => snapshot.uptime = output,
                _ => {}
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_produces_a_snapshot_with_platform_set() {
        let collector = CommandCollector::new();
        let snapshot = collector.collect().await.unwrap();
        assert_eq!(snapshot.platform, collector.platform());
        // At least one section command should succeed on any unix host.
        assert!(!snapshot.to_document().is_empty());
    }

    #[tokio::test]
    async fn failed_section_leaves_it_empty() {
        let collector = CommandCollector::new();
        let out = collector
            .capture("bogus", "definitely-not-a-real-command-xyz")
            .await;
        assert!(out.is_empty());
    }
}
