//! Telemetry collaborator — structured machine snapshots.
//!
//! How a snapshot is produced is out of the core's hands; the core only
//! defines the accessor shapes the tools read (cpu, memory, disk,
//! processes, network, thermal, battery, uptime). Each section is a
//! pre-formatted human-readable report, ready for prompt injection or
//! embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A point-in-time snapshot of host telemetry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// When the snapshot was taken.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Platform name (linux, darwin, windows).
    #[serde(default)]
    pub platform: String,

    pub cpu: String,
    pub memory: String,
    pub disk: String,
    pub processes: String,
    pub network: String,
    pub thermal: String,
    pub battery: String,
    pub uptime: String,
}

impl SystemSnapshot {
    /// Look up a section by the topic words a tool request mentions.
    pub fn section(&self, topic: &str) -> Option<&str> {
        let t = topic.to_lowercase();
        let pick = if t.contains("cpu") {
            &self.cpu
        } else if t.contains("memory") || t.contains("ram") {
            &self.memory
        } else if t.contains("disk") {
            &self.disk
        } else if t.contains("process") {
            &self.processes
        } else if t.contains("network") {
            &self.network
        } else if t.contains("temperature") || t.contains("thermal") {
            &self.thermal
        } else if t.contains("battery") {
            &self.battery
        } else if t.contains("uptime") {
            &self.uptime
        } else {
            return None;
        };
        if pick.is_empty() { None } else { Some(pick) }
    }

    /// Flatten the snapshot into one labeled document for indexing.
    pub fn to_document(&self) -> String {
        let mut doc = format!(
            "System snapshot collected at {} on {}\n\n",
            self.timestamp.to_rfc3339(),
            self.platform
        );
        for (label, body) in [
            ("CPU", &self.cpu),
            ("Memory", &self.memory),
            ("Disk", &self.disk),
            ("Processes", &self.processes),
            ("Network", &self.network),
            ("Thermal", &self.thermal),
            ("Battery", &self.battery),
            ("Uptime", &self.uptime),
        ] {
            if !body.is_empty() {
                doc.push_str(&format!("## {label}\n{body}\n\n"));
            }
        }
        doc
    }
}

/// The telemetry collaborator: produces snapshots on demand.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Platform name of the host being observed.
    fn platform(&self) -> &str;

    /// Collect a fresh snapshot.
    async fn collect(&self) -> std::result::Result<SystemSnapshot, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SystemSnapshot {
        SystemSnapshot {
            platform: "linux".into(),
            cpu: "CPU Usage: 12.5% average across 8 cores".into(),
            memory: "Physical Memory: 4.1GB / 16.0GB (25%)".into(),
            uptime: "System uptime: 3 days".into(),
            ..Default::default()
        }
    }

    #[test]
    fn section_lookup_by_topic() {
        let s = snapshot();
        assert!(s.section("what is my cpu usage").unwrap().contains("12.5%"));
        assert!(s.section("free ram please").unwrap().contains("16.0GB"));
        assert!(s.section("uptime").unwrap().contains("3 days"));
        assert!(s.section("disk space").is_none()); // empty section
        assert!(s.section("unrelated request").is_none());
    }

    #[test]
    fn document_includes_nonempty_sections_only() {
        let doc = snapshot().to_document();
        assert!(doc.contains("## CPU"));
        assert!(doc.contains("## Memory"));
        assert!(!doc.contains("## Disk"));
        assert!(doc.contains("linux"));
    }
}
