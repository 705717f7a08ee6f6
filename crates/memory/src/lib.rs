//! Interaction memory: a short in-process session window plus a
//! persisted log ranked by lexical overlap with the current query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use sysward_core::error::MemoryError;
use tracing::{debug, warn};
use uuid::Uuid;

/// Hard cap on the persisted interaction log. Oldest entries fall off.
pub const MAX_INTERACTIONS: usize = 1000;

/// Exchanges retained in the in-process session window.
pub const SESSION_WINDOW: usize = 20;

/// One user/assistant exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub ai_response: String,
    /// Structured context captured with the exchange (active pattern, ...).
    #[serde(default)]
    pub context: Map<String, Value>,
}

impl Interaction {
    pub fn new(user_input: &str, ai_response: &str, context: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_input: user_input.to_string(),
            ai_response: ai_response.to_string(),
            context,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoryFile {
    interactions: Vec<Interaction>,
}

/// Capped interaction log with whole-document JSON persistence.
#[derive(Debug)]
pub struct MemoryManager {
    path: PathBuf,
    interactions: Vec<Interaction>,
    session: Vec<Interaction>,
}

impl MemoryManager {
    /// Open (or create) the memory file at `path`. An unreadable or
    /// corrupt file starts the log fresh rather than failing the session.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MemoryError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MemoryError::Storage(e.to_string()))?;
        }

        let interactions = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<MemoryFile>(&raw) {
                Ok(file) => file.interactions,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Memory file unreadable, starting fresh");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        debug!(count = interactions.len(), "Memory loaded");

        Ok(Self {
            path,
            interactions,
            session: Vec::new(),
        })
    }

    /// Record one exchange in both the session window and the persisted
    /// log, evicting the oldest entries past their caps.
    pub fn add_interaction(
        &mut self,
        user_input: &str,
        ai_response: &str,
        context: Map<String, Value>,
    ) -> Result<(), MemoryError> {
        let interaction = Interaction::new(user_input, ai_response, context);

        self.session.push(interaction.clone());
        while self.session.len() > SESSION_WINDOW {
            self.session.remove(0);
        }

        self.interactions.push(interaction);
        while self.interactions.len() > MAX_INTERACTIONS {
            self.interactions.remove(0);
        }

        self.persist()
    }

    /// Past interactions most lexically similar to `query`, best first.
    /// Score is the number of distinct words the query shares with the
    /// interaction's input and response combined; zero scorers are
    /// excluded, ties stay in chronological order.
    pub fn relevant_context(&self, query: &str, max_items: usize) -> Vec<&Interaction> {
        let query_words = word_set(query);
        if query_words.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &Interaction)> = self
            .interactions
            .iter()
            .filter_map(|i| {
                let mut words = word_set(&i.user_input);
                words.extend(word_set(&i.ai_response));
                let score = words.intersection(&query_words).count();
                (score > 0).then_some((score, i))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(max_items).map(|(_, i)| i).collect()
    }

    /// The current session window, oldest first.
    pub fn session_window(&self) -> &[Interaction] {
        &self.session
    }

    /// Short textual summary of the current session.
    pub fn session_summary(&self) -> String {
        if self.session.is_empty() {
            return "No interactions this session.".to_string();
        }
        let topics: Vec<&str> = self
            .session
            .iter()
            .rev()
            .take(3)
            .map(|i| i.user_input.as_str())
            .collect();
        format!(
            "{} exchange(s) this session. Recent questions: {}",
            self.session.len(),
            topics.join("; ")
        )
    }

    /// Total interactions in the persisted log.
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), MemoryError> {
        let file = MemoryFile {
            interactions: self.interactions.clone(),
        };
        let json =
            serde_json::to_string_pretty(&file).map_err(|e| MemoryError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| MemoryError::Storage(e.to_string()))
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}
