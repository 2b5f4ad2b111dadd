//! Thread-safe cache handle and explicit caching wrappers
//!
//! One mutex guards the whole engine so the entry store and its eviction index
//! always move together. The wrapper methods replace implicit interception:
//! a service calls them around each cacheable operation.

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::engine::{CacheEngine, EvictionPolicy};
use crate::error::Result;
use crate::stats::CacheStats;
use crate::traits::Cache;

/// Cloneable handle to one shared cache engine
pub struct SharedCache<K, V> {
    /// Engine plus its index, updated under a single lock
    engine: Arc<Mutex<CacheEngine<K, V>>>,

    /// Hit/miss/insert/eviction counters
    stats: Arc<CacheStats>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a shared cache with the given policy and capacity
    pub fn try_new(policy: EvictionPolicy, capacity: usize) -> Result<Self> {
        CacheEngine::try_new(policy, capacity).map(Self::from_engine)
    }

    /// Wrap an already built engine
    pub fn from_engine(engine: CacheEngine<K, V>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Get a copy of a cached value, touching its eviction metadata
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let value = self.engine.lock().get(key).cloned();
        match value {
            Some(_) => {
                self.stats.record_hit();
                trace!("cache hit");
            }
            None => {
                self.stats.record_miss();
                trace!("cache miss");
            }
        }
        value
    }

    /// Insert or replace a value
    pub fn put(&self, key: K, value: V) {
        let mut engine = self.engine.lock();
        if !engine.contains_key(&key) {
            if engine.len() >= engine.capacity() {
                self.stats.record_eviction();
            }
            self.stats.record_insert();
        }
        engine.put(key, value);
    }

    /// Remove a key; absent keys are ignored
    pub fn delete(&self, key: &K) {
        self.engine.lock().delete(key);
    }

    /// Presence check without touching eviction metadata
    pub fn contains_key(&self, key: &K) -> bool {
        self.engine.lock().contains_key(key)
    }

    /// Evict one victim chosen by the policy
    pub fn evict(&self) {
        let mut engine = self.engine.lock();
        if !engine.is_empty() {
            engine.evict();
            self.stats.record_eviction();
        }
    }

    /// Snapshot of all cached values, in no particular order
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.engine.lock().values().into_iter().cloned().collect()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.engine.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.engine.lock().is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.engine.lock().capacity()
    }

    /// Policy backing this cache
    pub fn policy(&self) -> EvictionPolicy {
        self.engine.lock().policy()
    }

    /// Drop all entries and reset statistics
    pub fn clear(&self) {
        self.engine.lock().clear();
        self.stats.reset();
    }

    /// Cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Read-through lookup
    ///
    /// Returns the cached value on a hit. On a miss runs `loader` without
    /// holding the lock and caches its result. A failed load caches nothing.
    pub fn get_or_load<E, F>(&self, key: K, loader: F) -> std::result::Result<V, E>
    where
        V: Clone,
        F: FnOnce(&K) -> std::result::Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = loader(&key)?;
        self.put(key, value.clone());
        Ok(value)
    }

    /// Write-through for create and update operations
    ///
    /// Runs `op` and caches the value it returns under `key_of(&value)`.
    pub fn put_with<E, F, G>(&self, op: F, key_of: G) -> std::result::Result<V, E>
    where
        V: Clone,
        F: FnOnce() -> std::result::Result<V, E>,
        G: FnOnce(&V) -> K,
    {
        let value = op()?;
        self.put(key_of(&value), value.clone());
        Ok(value)
    }

    /// Invalidate a key, then run the delete operation
    pub fn delete_with<T, E, F>(&self, key: &K, op: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        self.delete(key);
        op()
    }
}
