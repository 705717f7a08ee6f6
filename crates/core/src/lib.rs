//! # sysward Core
//!
//! Domain types, traits, and error definitions for the sysward
//! system-administration assistant. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here: the language model
//! (`Provider`), capabilities (`Tool`), similarity search (`Retriever`),
//! and machine telemetry (`Collector`). Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod pattern;
pub mod provider;
pub mod result;
pub mod retrieval;
pub mod snapshot;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use pattern::PatternId;
pub use provider::{EmbeddingRequest, EmbeddingResponse, ModelRequest, ModelResponse, Provider, Usage};
pub use result::{AgentResult, ReasoningStep};
pub use retrieval::{Retriever, Snippet};
pub use snapshot::{Collector, SystemSnapshot};
pub use tool::{SafetyClass, Tool, ToolRegistry};
