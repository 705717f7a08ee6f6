//! Session wiring: collaborators, agent, and the background collector.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sysward_agent::{Collaborators, SessionAgent};
use sysward_cache::ResponseCache;
use sysward_config::AppConfig;
use sysward_core::{AgentResult, Collector, PatternId, Retriever};
use sysward_exec::{ExecPolicy, StdinConfirmer};
use sysward_memory::MemoryManager;
use sysward_providers::OpenAiCompatProvider;
use sysward_retrieval::SnippetStore;
use sysward_telemetry::CommandCollector;
use sysward_tools::{default_registry, ToolDeps};
use tracing::{info, warn};

/// One running assistant session: agent, collaborators, bookkeeping.
pub struct Session {
    pub config: AppConfig,
    pub agent: SessionAgent,
    pub retriever: Arc<dyn Retriever>,
    pub collector: Arc<dyn Collector>,
    pub started: DateTime<Utc>,
    pub last_collection: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl Session {
    /// Wire every collaborator from config and build the default agent.
    pub fn build(config: AppConfig) -> Result<Self> {
        let provider: Arc<OpenAiCompatProvider> = Arc::new(
            OpenAiCompatProvider::from_config(&config)
                .context("provider configuration (is an API key set?)")?,
        );

        let retriever: Arc<dyn Retriever> = Arc::new(SnippetStore::open(
            provider.clone(),
            config.embedding_model.clone(),
            config.retrieval_path(),
        )?);
        let collector: Arc<dyn Collector> = Arc::new(CommandCollector::new());

        let policy = ExecPolicy::new(
            config.security.safe_mode,
            config.security.allowed_commands.clone(),
        );
        let registry = default_registry(ToolDeps {
            provider: provider.clone(),
            retriever: retriever.clone(),
            collector: collector.clone(),
            confirmer: Arc::new(StdinConfirmer),
            policy,
            model: config.default_model.clone(),
            require_confirmation: config.security.require_confirmation,
        });

        // A disabled cache is a zero-TTL cache: every read is a miss.
        let ttl = if config.cache.enabled {
            Duration::from_secs(config.cache.ttl_secs)
        } else {
            Duration::ZERO
        };
        let cache = Arc::new(ResponseCache::new(config.cache_dir(), ttl)?);
        let memory = Arc::new(Mutex::new(MemoryManager::open(config.memory_path())?));

        let collab = Collaborators {
            provider,
            tools: Arc::new(registry),
            cache,
            memory,
            model: config.default_model.clone(),
            max_iterations: config.agent.max_iterations as usize,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };
        let agent = SessionAgent::new(config.agent.default_pattern, collab);

        Ok(Self {
            config,
            agent,
            retriever,
            collector,
            started: Utc::now(),
            last_collection: Arc::new(Mutex::new(None)),
        })
    }

    /// Ask the active strategy and record the exchange in memory.
    pub async fn ask(&self, question: &str) -> AgentResult {
        let result = self.agent.ask(question).await;
        let mut context = Map::new();
        context.insert(
            "pattern".to_string(),
            Value::String(self.agent.pattern().as_str().to_string()),
        );
        if let Ok(mut memory) = self.agent.collaborators().memory.lock() {
            if let Err(e) = memory.add_interaction(question, &result.output, context) {
                warn!(error = %e, "Failed to record interaction");
            }
        }
        result
    }

    /// How many stored interactions look similar to `question`.
    pub fn related_count(&self, question: &str) -> usize {
        self.agent
            .collaborators()
            .memory
            .lock()
            .map(|m| m.relevant_context(question, 3).len())
            .unwrap_or(0)
    }

    /// Collect one snapshot, index it, and drop expired cache entries.
    pub async fn collect_once(&self) -> Result<()> {
        collect_and_index(
            &self.collector,
            &self.retriever,
            &self.agent.collaborators().cache,
            &self.last_collection,
        )
        .await
    }

    /// Spawn the periodic collection task, if enabled in config.
    pub fn spawn_background_collection(&self) {
        if !self.config.collection.background {
            return;
        }
        let collector = self.collector.clone();
        let retriever = self.retriever.clone();
        let cache = self.agent.collaborators().cache.clone();
        let last_collection = self.last_collection.clone();
        let interval = Duration::from_secs(self.config.collection.interval_hours * 3600);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // the first tick fires immediately
            loop {
                ticker.tick().await;
                if let Err(e) =
                    collect_and_index(&collector, &retriever, &cache, &last_collection).await
                {
                    warn!(error = %e, "Background collection failed");
                }
            }
        });
    }

    /// The `status` view.
    pub fn status_text(&self) -> String {
        let duration = Utc::now().signed_duration_since(self.started);
        let last = self
            .last_collection
            .lock()
            .ok()
            .and_then(|l| *l)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "Never".to_string());
        let summary = self
            .agent
            .collaborators()
            .memory
            .lock()
            .map(|m| m.session_summary())
            .unwrap_or_else(|_| "unavailable".to_string());
        let pattern = self.agent.pattern();

        format!(
            "System\n\
             \x20 Platform: {}\n\
             \x20 Session duration: {}m {}s\n\
             \x20 Last data collection: {}\n\
             \x20 Background collection: {}\n\
             Agent\n\
             \x20 Current pattern: {} ({})\n\
             \x20 Max iterations: {}\n\
             \x20 Safe mode: {}\n\
             Memory\n\
             \x20 {}\n\
             Cache\n\
             \x20 {}",
            self.collector.platform(),
            duration.num_minutes(),
            duration.num_seconds() % 60,
            last,
            if self.config.collection.background { "Enabled" } else { "Disabled" },
            pattern,
            pattern.description(),
            self.config.agent.max_iterations,
            if self.config.security.safe_mode { "Enabled" } else { "Disabled" },
            summary,
            if self.config.cache.enabled {
                format!("Enabled, TTL {}s", self.config.cache.ttl_secs)
            } else {
                "Disabled".to_string()
            },
        )
    }

    /// Switch the active pattern; cache and memory are untouched.
    pub fn switch_pattern(&mut self, pattern: PatternId) {
        self.agent.switch_pattern(pattern);
    }
}

/// Collect one snapshot, index its document, clear expired cache entries.
async fn collect_and_index(
    collector: &Arc<dyn Collector>,
    retriever: &Arc<dyn Retriever>,
    cache: &ResponseCache,
    last_collection: &Mutex<Option<DateTime<Utc>>>,
) -> Result<()> {
    let snapshot = collector.collect().await?;
    let mut metadata = Map::new();
    metadata.insert(
        "timestamp".to_string(),
        Value::String(snapshot.timestamp.to_rfc3339()),
    );
    metadata.insert(
        "platform".to_string(),
        Value::String(snapshot.platform.clone()),
    );
    retriever.add(&snapshot.to_document(), metadata).await?;

    let removed = cache.clear_expired()?;
    if removed > 0 {
        info!(removed, "Expired cache entries cleared during collection");
    }

    if let Ok(mut last) = last_collection.lock() {
        *last = Some(Utc::now());
    }
    info!("Telemetry snapshot collected and indexed");
    Ok(())
}
