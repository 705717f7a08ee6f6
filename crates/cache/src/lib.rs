//! File-backed TTL cache for agent answers.
//!
//! One JSON file per query, named by the sha256 hex digest of the exact
//! query text. An expired entry reads as a miss and is removed from disk
//! on the spot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysward_core::error::CacheError;
use sysward_core::AgentResult;
use tracing::{debug, warn};

/// A single cached answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub result: AgentResult,
}

/// TTL cache over a directory of per-query JSON files.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(Self { dir, ttl })
    }

    /// Two different query strings never share a key; the same string
    /// always maps to the same key. No normalization is applied.
    fn key(query: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(query.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, query: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key(query)))
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        let age = Utc::now().signed_duration_since(entry.timestamp);
        age.num_milliseconds() >= self.ttl.as_millis() as i64
    }

    /// Look up a cached answer. Expired or unreadable entries are misses
    /// and are deleted.
    pub fn get(&self, query: &str) -> Option<AgentResult> {
        let path = self.entry_path(query);
        let raw = std::fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Dropping corrupted cache entry");
                let _ = std::fs::remove_file(&path);
                return None;
            }
        };
        if self.is_expired(&entry) {
            debug!(path = %path.display(), "Cache entry expired");
            let _ = std::fs::remove_file(&path);
            return None;
        }
        debug!(query = %entry.query, "Cache hit");
        Some(entry.result)
    }

    /// Store an answer. Write failures are logged and swallowed; a cache
    /// miss is always an acceptable outcome.
    pub fn set(&self, query: &str, result: &AgentResult) {
        let entry = CacheEntry {
            timestamp: Utc::now(),
            query: query.to_string(),
            result: result.clone(),
        };
        let path = self.entry_path(query);
        match serde_json::to_string_pretty(&entry) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(path = %path.display(), error = %e, "Cache write failed");
                }
            }
            Err(e) => warn!(error = %e, "Cache entry serialization failed"),
        }
    }

    /// Delete every expired entry; returns how many were removed.
    pub fn clear_expired(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for path in self.entry_files()? {
            let expired = match std::fs::read_to_string(&path) {
                Ok(raw) => match serde_json::from_str::<CacheEntry>(&raw) {
                    Ok(entry) => self.is_expired(&entry),
                    Err(_) => true,
                },
                Err(_) => true,
            };
            if expired && std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "Cleared expired cache entries");
        }
        Ok(removed)
    }

    /// Delete every entry regardless of age.
    pub fn clear_all(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for path in self.entry_files()? {
            if std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Number of entries currently on disk, expired or not.
    pub fn len(&self) -> Result<usize, CacheError> {
        Ok(self.entry_files()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>, CacheError> {
        let mut files = Vec::new();
        let entries =
            std::fs::read_dir(&self.dir).map_err(|e| CacheError::Storage(e.to_string()))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl: Duration) -> (tempfile::TempDir, ResponseCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), ttl).unwrap();
        (dir, cache)
    }

    #[test]
    fn set_then_get_round_trips() {
        let (_dir, cache) = cache(Duration::from_secs(300));
        let result = AgentResult::answer("disk is 40% full");
        cache.set("how full is my disk", &result);
        let hit = cache.get("how full is my disk").unwrap();
        assert_eq!(hit.output, "disk is 40% full");
        assert!(!hit.error);
    }

    #[test]
    fn unknown_query_is_a_miss() {
        let (_dir, cache) = cache(Duration::from_secs(300));
        assert!(cache.get("never asked").is_none());
    }

    #[test]
    fn distinct_queries_do_not_collide() {
        let (_dir, cache) = cache(Duration::from_secs(300));
        cache.set("query a", &AgentResult::answer("A"));
        cache.set("query b", &AgentResult::answer("B"));
        assert_eq!(cache.get("query a").unwrap().output, "A");
        assert_eq!(cache.get("query b").unwrap().output, "B");
    }

    #[test]
    fn whitespace_variants_are_different_keys() {
        let (_dir, cache) = cache(Duration::from_secs(300));
        cache.set("check cpu", &AgentResult::answer("ok"));
        assert!(cache.get(" check cpu").is_none());
        assert!(cache.get("Check cpu").is_none());
    }

    #[test]
    fn zero_ttl_expires_immediately_and_removes_the_file() {
        let (_dir, cache) = cache(Duration::ZERO);
        cache.set("q", &AgentResult::answer("a"));
        assert_eq!(cache.len().unwrap(), 1);
        assert!(cache.get("q").is_none());
        assert_eq!(cache.len().unwrap(), 0);
    }

    #[test]
    fn clear_expired_removes_only_stale_entries() {
        let (_dir, cache) = cache(Duration::from_secs(300));
        cache.set("keep", &AgentResult::answer("k"));
        cache.set("drop", &AgentResult::answer("d"));

        // Backdate one entry past the TTL.
        let path = cache.entry_path("drop");
        let mut entry: CacheEntry =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        entry.timestamp = Utc::now() - chrono::Duration::hours(1);
        std::fs::write(&path, serde_json::to_string(&entry).unwrap()).unwrap();

        assert_eq!(cache.clear_expired().unwrap(), 1);
        assert!(cache.get("keep").is_some());
        assert!(cache.get("drop").is_none());
    }

    #[test]
    fn clear_all_empties_the_directory() {
        let (_dir, cache) = cache(Duration::from_secs(300));
        cache.set("a", &AgentResult::answer("1"));
        cache.set("b", &AgentResult::answer("2"));
        assert_eq!(cache.clear_all().unwrap(), 2);
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn corrupted_entry_is_a_miss_and_gets_removed() {
        let (_dir, cache) = cache(Duration::from_secs(300));
        let path = cache.entry_path("bad");
        std::fs::write(&path, "not json").unwrap();
        assert!(cache.get("bad").is_none());
        assert!(!path.exists());
    }
}
