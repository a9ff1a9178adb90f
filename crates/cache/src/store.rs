use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::stats::CacheStats;

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, V>,
    /// tag name -> keys stored under it
    tags: HashMap<String, HashSet<String>>,
    stats: CacheStats,
}

/// Get-or-compute cache with tag based invalidation.
#[derive(Debug)]
pub struct TagAwareCache<V> {
    inner: RwLock<Inner<V>>,
    /// Lookup counters live outside the lock so hits only need a read guard
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TagAwareCache<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                tags: HashMap::new(),
                stats: CacheStats::new(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the value cached under `key`, or runs `producer`, stores its
    /// result under `key` labelled with `tags`, and returns it.
    ///
    /// Hits are served under the read lock. On a miss the write lock is held
    /// while the producer runs, so concurrent misses on the same key compute
    /// once. A producer error is returned as is and nothing is stored.
    pub async fn get<E, F>(&self, key: &str, tags: &[&str], producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let cached = self.inner.read().await.entries.get(key).cloned();
        if let Some(value) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        let mut inner = self.inner.write().await;

        // Filled by another task while this one waited for the write lock.
        if let Some(value) = inner.entries.get(key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key, ?tags, "cache miss, computing value");

        let value = producer()?;

        inner.entries.insert(key.to_string(), value.clone());
        for tag in tags {
            inner
                .tags
                .entry((*tag).to_string())
                .or_default()
                .insert(key.to_string());
        }
        let total = inner.entries.len();
        inner.stats.set_total_entries(total);

        Ok(value)
    }

    /// Evicts every entry stored under any of `tags`. Returns the number of
    /// entries removed.
    pub async fn invalidate_tags(&self, tags: &[&str]) -> usize {
        let mut inner = self.inner.write().await;

        let mut doomed = HashSet::new();
        for tag in tags {
            if let Some(keys) = inner.tags.remove(*tag) {
                doomed.extend(keys);
            }
        }

        let mut removed = 0;
        for key in &doomed {
            if inner.entries.remove(key).is_some() {
                removed += 1;
            }
        }

        // Drop references to evicted keys held by tags that were not invalidated.
        inner.tags.retain(|_, keys| {
            keys.retain(|key| !doomed.contains(key));
            !keys.is_empty()
        });

        inner.stats.record_invalidated(removed);
        let total = inner.entries.len();
        inner.stats.set_total_entries(total);

        tracing::debug!(?tags, removed, "cache tags invalidated");
        removed
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.read().await.entries.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        let mut stats = self.inner.read().await.stats.clone();
        stats.hits = self.hits.load(Ordering::Relaxed);
        stats.misses = self.misses.load(Ordering::Relaxed);
        stats
    }
}

impl<V: Clone> Default for TagAwareCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
