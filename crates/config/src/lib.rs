//! Configuration loading, validation, and management for sysward.
//!
//! Loads configuration from `~/.sysward/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use sysward_core::PatternId;
use tracing::warn;

/// The root configuration structure.
///
/// Maps directly to `~/.sysward/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat completions base URL (OpenAI-compatible endpoint).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Default model.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Embedding model used by the retrieval store.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per model response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Agent configuration.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Telemetry collection configuration.
    #[serde(default)]
    pub collection: CollectionConfig,

    /// Command-execution safety configuration.
    #[serde(default)]
    pub security: SecurityConfig,
}

fn default_api_url() -> String {
    // Gemini's OpenAI-compatible surface; any compatible endpoint works.
    "https://generativelanguage.googleapis.com/v1beta/openai".into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_embedding_model() -> String {
    "text-embedding-004".into()
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_tokens() -> u32 {
    2048
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("agent", &self.agent)
            .field("cache", &self.cache)
            .field("memory", &self.memory)
            .field("collection", &self.collection)
            .field("security", &self.security)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Pattern used at session start.
    #[serde(default = "default_pattern")]
    pub default_pattern: PatternId,

    /// Reasoning-loop iteration budget (Plan-Execute doubles this).
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_pattern() -> PatternId {
    PatternId::PlanExecute
}
fn default_max_iterations() -> u32 {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            default_pattern: default_pattern(),
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Entry time-to-live in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,

    /// Cache directory. Defaults to `~/.sysward/cache`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_cache_ttl() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_cache_ttl(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Interaction log file. Defaults to `~/.sysward/memory/interactions.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { path: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Whether the background telemetry collection task runs.
    #[serde(default = "default_true")]
    pub background: bool,

    /// Hours between background collections.
    #[serde(default = "default_collection_interval")]
    pub interval_hours: u64,

    /// Retrieval index file. Defaults to `~/.sysward/retrieval/snippets.jsonl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,
}

fn default_collection_interval() -> u64 {
    1
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            background: true,
            interval_hours: default_collection_interval(),
            index_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Mutating commands prompt for confirmation when set.
    #[serde(default = "default_true")]
    pub require_confirmation: bool,

    /// In safe mode, free-form read-only commands must be whitelisted.
    #[serde(default = "default_true")]
    pub safe_mode: bool,

    /// Whitelisted read-only command names.
    #[serde(default = "default_allowed_commands")]
    pub allowed_commands: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_allowed_commands() -> Vec<String> {
    ["ps", "top", "free", "df", "uptime", "whoami", "uname", "ss"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            require_confirmation: true,
            safe_mode: true,
            allowed_commands: default_allowed_commands(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            default_model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            agent: AgentConfig::default(),
            cache: CacheConfig::default(),
            memory: MemoryConfig::default(),
            collection: CollectionConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl AppConfig {
    /// The config directory: `~/.sysward`.
    pub fn config_dir() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".sysward")
    }

    /// Load configuration: file first, then environment overrides.
    pub fn load() -> sysward_core::Result<Self> {
        let path = Self::config_dir().join("config.toml");
        let mut config = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| sysward_core::Error::Config {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
            toml::from_str(&content).map_err(|e| sysward_core::Error::Config {
                message: format!("invalid config file {}: {e}", path.display()),
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a config document from a string (used by tests and `load`).
    pub fn from_toml(content: &str) -> sysward_core::Result<Self> {
        toml::from_str(content).map_err(|e| sysward_core::Error::Config {
            message: format!("invalid config: {e}"),
        })
    }

    /// Environment variables win over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("SYSWARD_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY")) {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("SYSWARD_MODEL") {
            self.default_model = model;
        }
        if let Ok(v) = std::env::var("SYSWARD_MAX_ITERATIONS") {
            match v.parse() {
                Ok(n) => self.agent.max_iterations = n,
                Err(_) => warn!(value = %v, "Ignoring non-numeric SYSWARD_MAX_ITERATIONS"),
            }
        }
        if let Ok(v) = std::env::var("SYSWARD_CACHE_TTL_SECS") {
            match v.parse() {
                Ok(n) => self.cache.ttl_secs = n,
                Err(_) => warn!(value = %v, "Ignoring non-numeric SYSWARD_CACHE_TTL_SECS"),
            }
        }
        if let Ok(v) = std::env::var("SYSWARD_SAFE_MODE") {
            self.security.safe_mode = v.eq_ignore_ascii_case("true") || v == "1";
        }
        if let Ok(v) = std::env::var("SYSWARD_REQUIRE_CONFIRMATION") {
            self.security.require_confirmation = v.eq_ignore_ascii_case("true") || v == "1";
        }
    }

    fn validate(&self) -> sysward_core::Result<()> {
        if self.agent.max_iterations == 0 {
            return Err(sysward_core::Error::Config {
                message: "agent.max_iterations must be at least 1".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(sysward_core::Error::Config {
                message: format!("temperature {} out of range [0, 2]", self.temperature),
            });
        }
        Ok(())
    }

    /// Resolved cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("cache"))
    }

    /// Resolved interaction-log path.
    pub fn memory_path(&self) -> PathBuf {
        self.memory
            .path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("memory").join("interactions.json"))
    }

    /// Resolved retrieval index path.
    pub fn retrieval_path(&self) -> PathBuf {
        self.collection
            .index_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("retrieval").join("snippets.jsonl"))
    }
}
