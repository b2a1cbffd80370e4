//! Time-boxed cache for schedule fetches
//!
//! Entries are keyed by fetch parameters and carry an explicit expiry. There
//! is no invalidation API: an entry is reused until it expires and then
//! replaced by the next fetch.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Fetch parameters identifying a cached schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKey {
    /// The rolling default window (now minus the configured days)
    DefaultWindow,
    /// An explicit window start
    Since(DateTime<Utc>),
}

impl From<Option<DateTime<Utc>>> for FetchKey {
    fn from(since: Option<DateTime<Utc>>) -> Self {
        since.map_or(Self::DefaultWindow, Self::Since)
    }
}

/// A cached fetch result
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Raw entries in page order
    pub entries: Vec<Value>,
    /// When the fetch completed
    pub cached_at: DateTime<Utc>,
    /// When the entry stops being served
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total cache hits
    pub hits: u64,
    /// Total cache misses (absent or expired)
    pub misses: u64,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// In-memory schedule cache owned by a session
#[derive(Debug)]
pub struct ScheduleCache {
    ttl: Duration,
    entries: HashMap<FetchKey, CacheEntry>,
    stats: CacheStats,
}

impl ScheduleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Get fresh entries for `key`
    pub fn get(&mut self, key: &FetchKey) -> Option<&[Value]> {
        self.get_at(key, Utc::now())
    }

    /// Get entries for `key` if still fresh at `now`
    pub fn get_at(&mut self, key: &FetchKey, now: DateTime<Utc>) -> Option<&[Value]> {
        let fresh = self.entries.get(key).is_some_and(|entry| entry.is_fresh(now));

        if !fresh {
            self.stats.misses += 1;
            if self.entries.remove(key).is_some() {
                tracing::debug!(?key, "Schedule cache entry expired");
            }
            return None;
        }

        self.stats.hits += 1;
        let entry = self.entries.get(key)?;
        tracing::debug!(
            ?key,
            age_secs = (now - entry.cached_at).num_seconds(),
            hit_rate = self.stats.hit_rate(),
            "Schedule cache hit"
        );
        Some(entry.entries.as_slice())
    }

    /// Store a fetch result
    pub fn insert(&mut self, key: FetchKey, entries: Vec<Value>) {
        self.insert_at(key, entries, Utc::now());
    }

    /// Store a fetch result completed at `now`
    pub fn insert_at(&mut self, key: FetchKey, entries: Vec<Value>, now: DateTime<Utc>) {
        let entry = CacheEntry {
            entries,
            cached_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        tracing::debug!(?key, expires_at = %entry.expires_at, "Cached schedule fetch");
        self.entries.insert(key, entry);
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
