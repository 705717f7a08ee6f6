//! Host telemetry collection for sysward.

pub mod collector;

pub use collector::CommandCollector;
