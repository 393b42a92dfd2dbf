// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory TTL cache shared across request handlers.

use dashmap::DashMap;
use serde::Serialize;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often the background sweeper purges stale entries.
pub const PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Concurrent map whose entries expire `ttl` after insertion.
///
/// Expired entries are never returned, but stay in the map until they are
/// overwritten or swept by [`TtlCache::purge_stale`].
#[derive(Clone)]
pub struct TtlCache<K, V> {
    entries: Arc<DashMap<K, Entry<V>>>,
    ttl: Duration,
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub fresh: usize,
    pub stale: usize,
    pub cache_duration_ms: u64,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Return the cached value if it is younger than the TTL.
    pub fn get_fresh(&self, key: &K) -> Option<V> {
        self.entries.get(key).and_then(|entry| {
            (entry.inserted_at.elapsed() < self.ttl).then(|| entry.value.clone())
        })
    }

    /// Insert or overwrite a value, resetting its age.
    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Return the fresh cached value, or run `fetch` and cache its result.
    ///
    /// The boolean is `true` when the value came from the cache. Errors from
    /// `fetch` are passed through and nothing is stored.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, fetch: F) -> Result<(V, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get_fresh(&key) {
            return Ok((value, true));
        }

        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok((value, false))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry and return how many were dropped.
    pub fn clear(&self) -> usize {
        let size = self.entries.len();
        self.entries.clear();
        size
    }

    pub fn stats(&self) -> CacheStats {
        let fresh = self
            .entries
            .iter()
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .count();
        let size = self.entries.len();

        CacheStats {
            size,
            fresh,
            stale: size.saturating_sub(fresh),
            cache_duration_ms: self.ttl.as_millis() as u64,
        }
    }

    /// Drop entries older than twice the TTL. Returns the number removed.
    pub fn purge_stale(&self) -> usize {
        let max_age = self.ttl * 2;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() <= max_age);
        before.saturating_sub(self.entries.len())
    }
}
