//! The five interchangeable orchestration strategies.
//!
//! Each strategy owns its prompt voice and its reasoning-loop layout,
//! but they all share one contract: take a query, hand back one
//! [`AgentResult`], never raise. Cache read-through/write-through lives
//! in [`cached`] so every pattern behaves identically around the cache.

pub mod conversational;
pub mod multi_agent;
pub mod plan_execute;
pub mod react;
pub mod self_ask;
pub(crate) mod test_helpers;

use async_trait::async_trait;
use std::future::Future;
use sysward_cache::ResponseCache;
use sysward_core::{AgentResult, PatternId};
use tracing::debug;

pub use conversational::ConversationalStrategy;
pub use multi_agent::MultiAgentStrategy;
pub use plan_execute::PlanExecuteStrategy;
pub use react::ReactStrategy;
pub use self_ask::SelfAskStrategy;

/// One agent orchestration strategy.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Which pattern this strategy implements.
    fn pattern(&self) -> PatternId;

    /// The system instructions this strategy prompts with.
    fn prompt_template(&self) -> &str;

    /// Answer one query. Failures are encoded in the result, never raised.
    async fn execute_query(&self, query: &str) -> AgentResult;
}

/// Cache wrapper shared by all strategies: a hit is returned unmodified
/// with no model call; a successful miss is written through.
pub(crate) async fn cached<F>(cache: &ResponseCache, query: &str, run: F) -> AgentResult
where
    F: Future<Output = AgentResult>,
{
    if let Some(hit) = cache.get(query) {
        debug!("Returning cached result");
        return hit;
    }
    let result = run.await;
    if !result.error {
        cache.set(query, &result);
    }
    result
}
