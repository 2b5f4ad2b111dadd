//! Policy selection
//!
//! [`CacheEngine`] is a closed choice between the two engines, picked once at
//! construction from an [`EvictionPolicy`].

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lfu::LfuCache;
use crate::lru::LruCache;
use crate::traits::Cache;

/// Eviction policy backing a cache instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub enum EvictionPolicy {
    /// Least Recently Used
    #[default]
    Lru,
    /// Least Frequently Used
    Lfu,
}

impl EvictionPolicy {
    /// Canonical configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "LRU",
            EvictionPolicy::Lfu => "LFU",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LRU" => Ok(EvictionPolicy::Lru),
            "LFU" => Ok(EvictionPolicy::Lfu),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for EvictionPolicy {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<EvictionPolicy> for String {
    fn from(policy: EvictionPolicy) -> Self {
        policy.as_str().to_string()
    }
}

/// A cache engine of either policy behind one contract
pub enum CacheEngine<K, V> {
    /// Recency-ordered engine
    Lru(LruCache<K, V>),
    /// Frequency-ordered engine
    Lfu(LfuCache<K, V>),
}

impl<K, V> CacheEngine<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Build an engine for the given policy and capacity
    pub fn try_new(policy: EvictionPolicy, capacity: usize) -> Result<Self> {
        Ok(match policy {
            EvictionPolicy::Lru => CacheEngine::Lru(LruCache::try_new(capacity)?),
            EvictionPolicy::Lfu => CacheEngine::Lfu(LfuCache::try_new(capacity)?),
        })
    }

    /// Policy this engine was built with
    pub fn policy(&self) -> EvictionPolicy {
        match self {
            CacheEngine::Lru(_) => EvictionPolicy::Lru,
            CacheEngine::Lfu(_) => EvictionPolicy::Lfu,
        }
    }

    /// Remove a key and return its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self {
            CacheEngine::Lru(lru) => lru.remove(key),
            CacheEngine::Lfu(lfu) => lfu.remove(key),
        }
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        match self {
            CacheEngine::Lru(lru) => lru.check_invariants(),
            CacheEngine::Lfu(lfu) => lfu.check_invariants(),
        }
    }
}

impl<K, V> Cache<K, V> for CacheEngine<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        match self {
            CacheEngine::Lru(lru) => lru.get(key),
            CacheEngine::Lfu(lfu) => lfu.get(key),
        }
    }

    fn put(&mut self, key: K, value: V) {
        match self {
            CacheEngine::Lru(lru) => lru.put(key, value),
            CacheEngine::Lfu(lfu) => lfu.put(key, value),
        }
    }

    fn delete(&mut self, key: &K) {
        match self {
            CacheEngine::Lru(lru) => lru.delete(key),
            CacheEngine::Lfu(lfu) => lfu.delete(key),
        }
    }

    fn contains_key(&self, key: &K) -> bool {
        match self {
            CacheEngine::Lru(lru) => lru.contains_key(key),
            CacheEngine::Lfu(lfu) => lfu.contains_key(key),
        }
    }

    fn evict(&mut self) {
        match self {
            CacheEngine::Lru(lru) => lru.evict(),
            CacheEngine::Lfu(lfu) => lfu.evict(),
        }
    }

    fn values(&self) -> Vec<&V> {
        match self {
            CacheEngine::Lru(lru) => lru.values(),
            CacheEngine::Lfu(lfu) => lfu.values(),
        }
    }

    fn len(&self) -> usize {
        match self {
            CacheEngine::Lru(lru) => lru.len(),
            CacheEngine::Lfu(lfu) => lfu.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            CacheEngine::Lru(lru) => lru.capacity(),
            CacheEngine::Lfu(lfu) => lfu.capacity(),
        }
    }

    fn clear(&mut self) {
        match self {
            CacheEngine::Lru(lru) => lru.clear(),
            CacheEngine::Lfu(lfu) => lfu.clear(),
        }
    }
}
