//! Per-query result cache.
//!
//! One JSON document maps the SHA-256 of each query string to the formatted
//! articles that query last produced, with the fetch timestamp. A fresh
//! entry lets a run skip the network for that query entirely. Stale entries
//! are never an error: they are ignored on read and superseded in place on
//! the next fetch. A missing or corrupt cache file degrades to an empty
//! cache.

use std::collections::HashMap;
use std::fs;
use std::io;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::models::Article;

/// One cached query result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheEntry {
    /// RFC 3339 fetch time; freshness is measured against this.
    pub timestamp: String,
    /// The normalized articles the query produced.
    pub articles: Vec<Article>,
}

/// The on-disk cache plus its staleness policy.
#[derive(Debug)]
pub struct CacheStore {
    path: String,
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    /// Read the cache file at `path`. Absence or corruption yields an empty
    /// cache; neither ever fails the run.
    pub fn load(path: &str, ttl: std::time::Duration) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or(Duration::MAX);
        let entries = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path, error = %e, "Cache file is corrupt; starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(path, error = %e, "Cache file is unreadable; starting empty");
                HashMap::new()
            }
        };
        debug!(path, entries = entries.len(), "Loaded query cache");

        Self {
            path: path.to_string(),
            ttl,
            entries,
        }
    }

    /// Return the cached articles for `query` if the entry is still fresh.
    pub fn lookup(&self, query: &str, now: DateTime<Utc>) -> Option<&[Article]> {
        let entry = self.entries.get(&query_key(query))?;
        let fetched_at = DateTime::parse_from_rfc3339(&entry.timestamp)
            .ok()?
            .with_timezone(&Utc);

        if now.signed_duration_since(fetched_at) < self.ttl {
            Some(&entry.articles)
        } else {
            None
        }
    }

    /// Record a query's articles, superseding any previous entry.
    pub fn insert(&mut self, query: &str, articles: Vec<Article>, now: DateTime<Utc>) {
        self.entries.insert(
            query_key(query),
            CacheEntry {
                timestamp: now.to_rfc3339(),
                articles,
            },
        );
    }

    /// Persist the cache document.
    pub fn save(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(io::Error::other)?;
        fs::write(&self.path, json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deterministic cache key: hex SHA-256 of the query text.
fn query_key(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::time::Duration as StdDuration;

    const DAY: StdDuration = StdDuration::from_secs(24 * 3600);

    fn temp_cache_path() -> String {
        let suffix: u64 = rand::rng().random();
        std::env::temp_dir()
            .join(format!("verdant_cache_{}_{suffix}.json", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    fn sample_articles() -> Vec<Article> {
        vec![Article {
            title: "T".to_string(),
            url: "https://example.com/1".to_string(),
            source: "S".to_string(),
            date: "04-11-2025".to_string(),
            description: "D".to_string(),
            image_url: String::new(),
            keyword: "q".to_string(),
        }]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let store = CacheStore::load(&temp_cache_path(), DAY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = temp_cache_path();
        fs::write(&path, "{not valid json").unwrap();

        let store = CacheStore::load(&path, DAY);
        assert!(store.is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_fresh_entry_hit() {
        let now = Utc::now();
        let mut store = CacheStore::load(&temp_cache_path(), DAY);
        store.insert("circular economy", sample_articles(), now);

        let hit = store.lookup("circular economy", now + Duration::hours(1));
        assert_eq!(hit.map(<[Article]>::len), Some(1));
        assert!(store.lookup("other query", now).is_none());
    }

    #[test]
    fn test_stale_entry_is_ignored() {
        let now = Utc::now();
        let mut store = CacheStore::load(&temp_cache_path(), DAY);
        store.insert("q", sample_articles(), now - Duration::hours(25));

        assert!(store.lookup("q", now).is_none());
    }

    #[test]
    fn test_insert_supersedes_previous_entry() {
        let now = Utc::now();
        let mut store = CacheStore::load(&temp_cache_path(), DAY);
        store.insert("q", sample_articles(), now - Duration::hours(25));
        store.insert("q", Vec::new(), now);

        assert_eq!(store.len(), 1);
        let hit = store.lookup("q", now).unwrap();
        assert!(hit.is_empty());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let path = temp_cache_path();
        let now = Utc::now();

        let mut store = CacheStore::load(&path, DAY);
        store.insert("q", sample_articles(), now);
        store.save().unwrap();

        let reloaded = CacheStore::load(&path, DAY);
        let hit = reloaded.lookup("q", now).unwrap();
        assert_eq!(hit[0].url, "https://example.com/1");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_query_key_is_deterministic() {
        assert_eq!(query_key("abc"), query_key("abc"));
        assert_ne!(query_key("abc"), query_key("abd"));
        assert_eq!(query_key("abc").len(), 64);
    }
}
