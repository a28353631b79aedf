//! In-memory response cache with TTL.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Cache entry with timestamp
struct CacheEntry {
    data: Value,
    cached_at: DateTime<Utc>,
}

/// Upstream endpoints, used as cache categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    Meets,
    Entries,
    Results,
}

impl CacheCategory {
    pub fn name(&self) -> &'static str {
        match self {
            CacheCategory::Meets => "meets",
            CacheCategory::Entries => "entries",
            CacheCategory::Results => "results",
        }
    }
}

/// Response envelopes keyed by (endpoint, parameter)
pub struct Cache {
    ttl: Duration,
    entries: Mutex<HashMap<(CacheCategory, String), CacheEntry>>,
}

impl Cache {
    /// Create a cache; a zero TTL disables it
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.min(u64::from(u32::MAX)) as i64),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.ttl > Duration::zero()
    }

    /// Get cached data if still fresh
    pub async fn get(&self, category: CacheCategory, key: &str) -> Option<Value> {
        if !self.enabled() {
            return None;
        }

        let mut entries = self.entries.lock().await;
        let cache_key = (category, key.to_string());
        let entry = entries.get(&cache_key)?;

        if Utc::now() - entry.cached_at > self.ttl {
            entries.remove(&cache_key);
            return None;
        }

        Some(entry.data.clone())
    }

    /// Store data, evicting anything that has expired
    pub async fn set(&self, category: CacheCategory, key: &str, data: &Value) {
        if !self.enabled() {
            return;
        }

        let now = Utc::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| now - entry.cached_at <= self.ttl);
        entries.insert(
            (category, key.to_string()),
            CacheEntry {
                data: data.clone(),
                cached_at: now,
            },
        );
    }
}

#[cfg(test)]
impl Cache {
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
