//! The cache contract shared by every engine

/// Uniform contract implemented by [`LruCache`](crate::LruCache),
/// [`LfuCache`](crate::LfuCache) and [`CacheEngine`](crate::CacheEngine).
///
/// `get` takes `&mut self` because a hit updates recency or frequency
/// metadata. Callers that share an engine across threads go through
/// [`SharedCache`](crate::SharedCache).
pub trait Cache<K, V> {
    /// Look up a key, touching its eviction metadata on a hit
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Insert or replace a value, evicting one victim first when a new key
    /// arrives at a full cache
    fn put(&mut self, key: K, value: V);

    /// Remove a key; absent keys are ignored
    fn delete(&mut self, key: &K);

    /// Presence check without touching eviction metadata
    fn contains_key(&self, key: &K) -> bool;

    /// Remove exactly one victim chosen by the policy; no-op when empty
    fn evict(&mut self);

    /// All stored values, in no particular order
    fn values(&self) -> Vec<&V>;

    /// Number of stored entries
    fn len(&self) -> usize;

    /// Check if the cache holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    fn capacity(&self) -> usize;

    /// Drop every entry
    fn clear(&mut self);
}
