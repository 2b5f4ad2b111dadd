//! LFU (Least Frequently Used) cache implementation
//!
//! ## Layout
//! - **Entries**: slot arena of nodes, each linked into exactly one bucket
//! - **Buckets**: one per distinct frequency, chained in ascending order
//! - **Root bucket**: frequency 1, created eagerly and never unlinked
//!
//! Every bucket other than the root is non-empty, so the minimum non-empty
//! tier is either the root or its successor. Within a bucket keys are kept in
//! arrival order and eviction takes the oldest arrival.

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;
use tracing::debug;

use crate::arena::SlotArena;
use crate::error::{Error, Result};
use crate::traits::Cache;

/// Slot of the frequency-1 bucket
const ROOT: usize = 0;

struct Entry<K, V> {
    key: K,
    value: V,
    bucket: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Keys sharing one access count, oldest arrival at `head`
struct Bucket {
    freq: u64,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Bucket {
    fn new(freq: u64) -> Self {
        Self {
            freq,
            head: None,
            tail: None,
            len: 0,
            prev: None,
            next: None,
        }
    }
}

/// LFU cache with fixed capacity
pub struct LfuCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    entries: SlotArena<Entry<K, V>>,
    buckets: SlotArena<Bucket>,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LFU cache with the given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is zero. Use [`LfuCache::try_new`] for
    /// user-supplied values.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        let mut buckets = SlotArena::with_capacity(8);
        let root = buckets.insert(Bucket::new(1));
        debug_assert_eq!(root, ROOT);

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            entries: SlotArena::with_capacity(capacity),
            buckets,
            capacity,
        }
    }

    /// Create a new LFU cache, rejecting a zero capacity
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self::new(capacity))
    }

    /// Current access count of a key, without touching it
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let idx = *self.map.get(key)?;
        let bucket = self.entries.get(idx)?.bucket;
        self.buckets.get(bucket).map(|b| b.freq)
    }

    /// Remove a key and return its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        let bucket = self.entries.get(idx)?.bucket;
        self.detach(idx);
        self.release_if_empty(bucket);
        self.entries.remove(idx).map(|entry| entry.value)
    }

    /// Bump an entry's count and move it to the tail of the next tier
    fn touch(&mut self, idx: usize) {
        let Some(current) = self.entries.get(idx).map(|entry| entry.bucket) else {
            return;
        };
        let Some((freq, next)) = self.buckets.get(current).map(|b| (b.freq, b.next)) else {
            return;
        };

        let target = match next {
            Some(next_idx) if self.buckets.get(next_idx).map(|b| b.freq) == Some(freq + 1) => {
                next_idx
            }
            _ => self.insert_bucket_after(current, freq + 1),
        };

        self.detach(idx);
        self.attach(idx, target);
        self.release_if_empty(current);
    }

    /// Link a new bucket into the chain right after `after`
    fn insert_bucket_after(&mut self, after: usize, freq: u64) -> usize {
        let next = self.buckets.get(after).and_then(|b| b.next);
        let idx = self.buckets.insert(Bucket {
            prev: Some(after),
            next,
            ..Bucket::new(freq)
        });

        if let Some(bucket) = self.buckets.get_mut(after) {
            bucket.next = Some(idx);
        }
        if let Some(next_bucket) = next.and_then(|n| self.buckets.get_mut(n)) {
            next_bucket.prev = Some(idx);
        }

        idx
    }

    /// Unlink an emptied bucket; the root bucket always stays
    fn release_if_empty(&mut self, idx: usize) {
        if idx == ROOT {
            return;
        }
        let (prev, next) = match self.buckets.get(idx) {
            Some(bucket) if bucket.len == 0 => (bucket.prev, bucket.next),
            _ => return,
        };

        if let Some(prev_bucket) = prev.and_then(|p| self.buckets.get_mut(p)) {
            prev_bucket.next = next;
        }
        if let Some(next_bucket) = next.and_then(|n| self.buckets.get_mut(n)) {
            next_bucket.prev = prev;
        }
        self.buckets.remove(idx);
    }

    /// Append an entry at the tail of a bucket
    fn attach(&mut self, idx: usize, bucket_idx: usize) {
        let old_tail = match self.buckets.get_mut(bucket_idx) {
            Some(bucket) => {
                let old_tail = bucket.tail;
                bucket.tail = Some(idx);
                if bucket.head.is_none() {
                    bucket.head = Some(idx);
                }
                bucket.len += 1;
                old_tail
            }
            None => return,
        };

        if let Some(tail) = old_tail.and_then(|t| self.entries.get_mut(t)) {
            tail.next = Some(idx);
        }
        if let Some(entry) = self.entries.get_mut(idx) {
            entry.bucket = bucket_idx;
            entry.prev = old_tail;
            entry.next = None;
        }
    }

    /// Unlink an entry from its bucket, leaving the bucket in place
    fn detach(&mut self, idx: usize) {
        let (bucket_idx, prev, next) = match self.entries.get(idx) {
            Some(entry) => (entry.bucket, entry.prev, entry.next),
            None => return,
        };

        match prev.and_then(|p| self.entries.get_mut(p)) {
            Some(prev_entry) => prev_entry.next = next,
            None => {
                if let Some(bucket) = self.buckets.get_mut(bucket_idx) {
                    bucket.head = next;
                }
            }
        }
        match next.and_then(|n| self.entries.get_mut(n)) {
            Some(next_entry) => next_entry.prev = prev,
            None => {
                if let Some(bucket) = self.buckets.get_mut(bucket_idx) {
                    bucket.tail = prev;
                }
            }
        }

        if let Some(bucket) = self.buckets.get_mut(bucket_idx) {
            bucket.len -= 1;
        }
        if let Some(entry) = self.entries.get_mut(idx) {
            entry.prev = None;
            entry.next = None;
        }
    }

    /// Lowest-frequency bucket holding at least one key
    fn min_bucket(&self) -> Option<usize> {
        let root = self.buckets.get(ROOT)?;
        if root.len > 0 {
            Some(ROOT)
        } else {
            root.next
        }
    }

    /// Buckets in chain order as `(freq, keys oldest first)`
    #[cfg(test)]
    fn tiers(&self) -> Vec<(u64, Vec<K>)> {
        let mut tiers = Vec::new();
        let mut cursor = Some(ROOT);
        while let Some(b) = cursor {
            let bucket = self.buckets.get(b).expect("dangling bucket link");
            let mut keys = Vec::new();
            let mut entry_cursor = bucket.head;
            while let Some(e) = entry_cursor {
                let entry = self.entries.get(e).expect("dangling entry link");
                keys.push(entry.key.clone());
                entry_cursor = entry.next;
            }
            tiers.push((bucket.freq, keys));
            cursor = bucket.next;
        }
        tiers
    }

    /// Verify the map, entries and bucket chain agree with each other
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut total = 0;
        let mut last_freq = 0;
        let mut prev_bucket = None;
        let mut cursor = Some(ROOT);
        while let Some(b) = cursor {
            let bucket = self.buckets.get(b).expect("dangling bucket link");
            assert_eq!(bucket.prev, prev_bucket, "broken bucket back link");
            assert!(bucket.freq > last_freq, "bucket chain out of order");
            assert!(b == ROOT || bucket.len > 0, "empty non-root bucket");

            let mut count = 0;
            let mut prev_entry = None;
            let mut entry_cursor = bucket.head;
            while let Some(e) = entry_cursor {
                let entry = self.entries.get(e).expect("dangling entry link");
                assert_eq!(entry.bucket, b, "entry in wrong bucket");
                assert_eq!(entry.prev, prev_entry, "broken entry back link");
                assert_eq!(self.map.get(&entry.key), Some(&e), "bucket key missing from map");
                count += 1;
                prev_entry = Some(e);
                entry_cursor = entry.next;
            }
            assert_eq!(bucket.tail, prev_entry);
            assert_eq!(bucket.len, count);

            total += count;
            last_freq = bucket.freq;
            prev_bucket = Some(b);
            cursor = bucket.next;
        }
        assert_eq!(total, self.map.len());
        assert_eq!(total, self.entries.len());
        assert!(self.map.len() <= self.capacity);
    }
}

impl<K, V> Cache<K, V> for LfuCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.touch(idx);
        self.entries.get(idx).map(|entry| &entry.value)
    }

    fn put(&mut self, key: K, value: V) {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(entry) = self.entries.get_mut(idx) {
                entry.value = value;
            }
            self.touch(idx);
            return;
        }

        if self.map.len() >= self.capacity {
            self.evict();
        }

        let idx = self.entries.insert(Entry {
            key: key.clone(),
            value,
            bucket: ROOT,
            prev: None,
            next: None,
        });
        self.attach(idx, ROOT);
        self.map.insert(key, idx);
    }

    fn delete(&mut self, key: &K) {
        self.remove(key);
    }

    fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn evict(&mut self) {
        let Some(bucket_idx) = self.min_bucket() else {
            return;
        };
        let Some((victim, freq)) = self
            .buckets
            .get(bucket_idx)
            .and_then(|b| b.head.map(|head| (head, b.freq)))
        else {
            return;
        };

        self.detach(victim);
        self.release_if_empty(bucket_idx);
        if let Some(entry) = self.entries.remove(victim) {
            self.map.remove(&entry.key);
            debug!(freq, len = self.map.len(), capacity = self.capacity, "evicted least frequently used entry");
        }
    }

    fn values(&self) -> Vec<&V> {
        self.entries.iter().map(|entry| &entry.value).collect()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.map.clear();
        self.entries.clear();
        self.buckets.clear();
        let root = self.buckets.insert(Bucket::new(1));
        debug_assert_eq!(root, ROOT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfu_basic() {
        let mut cache = LfuCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_evicts_least_frequent() {
        let mut cache = LfuCache::new(2);

        cache.put('a', 1);
        cache.put('b', 2);
        cache.get(&'a');
        cache.get(&'a');
        cache.put('c', 3); // b has frequency 1, a has 3

        assert!(cache.contains_key(&'a'));
        assert!(!cache.contains_key(&'b'));
        assert!(cache.contains_key(&'c'));
        assert_eq!(cache.frequency(&'a'), Some(3));
        assert_eq!(cache.frequency(&'c'), Some(1));
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_tie_breaks_by_arrival() {
        let mut cache = LfuCache::new(2);

        cache.put('a', 1);
        cache.put('b', 2);
        cache.put('c', 3); // a arrived first in tier 1

        assert!(!cache.contains_key(&'a'));
        assert!(cache.contains_key(&'b'));
        assert!(cache.contains_key(&'c'));
    }

    #[test]
    fn test_lfu_tie_break_uses_tier_arrival_not_insertion() {
        let mut cache = LfuCache::new(3);

        cache.put('a', 1);
        cache.put('b', 2);
        cache.put('c', 3);
        cache.get(&'b'); // b reaches tier 2 first
        cache.get(&'a'); // a reaches tier 2 second
        cache.get(&'c');
        cache.put('d', 4); // tier 1 is empty, tier 2 is [b, a, c]

        assert!(!cache.contains_key(&'b'));
        assert_eq!(
            cache.tiers(),
            vec![(1, vec!['d']), (2, vec!['a', 'c'])]
        );
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_put_existing_increments_frequency() {
        let mut cache = LfuCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(1, "z");
        cache.put(3, "c"); // 2 is alone in tier 1

        assert_eq!(cache.get(&1), Some(&"z"));
        assert_eq!(cache.frequency(&1), Some(3));
        assert!(!cache.contains_key(&2));
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_get_missing_has_no_side_effects() {
        let mut cache = LfuCache::new(2);

        cache.put(1, "a");
        assert_eq!(cache.get(&7), None);

        assert_eq!(cache.frequency(&1), Some(1));
        assert_eq!(cache.tiers(), vec![(1, vec![1])]);
    }

    #[test]
    fn test_lfu_contains_and_values_do_not_touch() {
        let mut cache = LfuCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        assert!(cache.contains_key(&1));
        assert_eq!(cache.values().len(), 2);

        assert_eq!(cache.frequency(&1), Some(1));
        assert_eq!(cache.frequency(&2), Some(1));
    }

    #[test]
    fn test_lfu_root_bucket_survives_when_empty() {
        let mut cache = LfuCache::new(2);

        cache.put(1, "a");
        cache.get(&1);
        cache.get(&1);

        assert_eq!(cache.tiers(), vec![(1, vec![]), (3, vec![1])]);
        cache.check_invariants();

        cache.put(2, "b");
        cache.put(3, "c"); // tier 1 is [2], so 2 goes
        assert!(!cache.contains_key(&2));
        assert!(cache.contains_key(&1));
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_evict_skips_empty_root() {
        let mut cache = LfuCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&1);
        cache.get(&2);
        cache.get(&2);
        cache.evict(); // tier 1 empty, tier 2 is [1]

        assert!(!cache.contains_key(&1));
        assert!(cache.contains_key(&2));
        assert_eq!(cache.tiers(), vec![(1, vec![]), (3, vec![2])]);
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_remove() {
        let mut cache = LfuCache::new(3);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&2);

        assert_eq!(cache.remove(&2), Some("b"));
        assert_eq!(cache.remove(&2), None);
        assert_eq!(cache.frequency(&2), None);
        assert_eq!(cache.tiers(), vec![(1, vec![1])]);
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_delete_then_reinsert_starts_at_one() {
        let mut cache = LfuCache::new(2);

        cache.put(1, "a");
        cache.get(&1);
        cache.delete(&1);
        cache.delete(&1);
        assert!(!cache.contains_key(&1));

        cache.put(1, "b");
        assert_eq!(cache.frequency(&1), Some(1));
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_evict_empty_is_noop() {
        let mut cache = LfuCache::<u32, u32>::new(2);
        cache.evict();
        assert!(cache.is_empty());
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_clear() {
        let mut cache = LfuCache::new(3);

        cache.put(1, "a");
        cache.get(&1);
        cache.put(2, "b");
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.tiers(), vec![(1, vec![])]);

        cache.put(3, "c");
        cache.check_invariants();
    }

    #[test]
    fn test_lfu_capacity_bound_under_churn() {
        let mut cache = LfuCache::new(4);

        for i in 0..200u32 {
            cache.put(i % 17, i);
            if i % 2 == 0 {
                cache.get(&(i % 5));
            }
            if i % 7 == 0 {
                cache.delete(&(i % 17));
            }
            assert!(cache.len() <= 4);
            cache.check_invariants();
        }
    }

    #[test]
    fn test_lfu_zero_capacity_rejected() {
        assert!(matches!(
            LfuCache::<u32, u32>::try_new(0),
            Err(Error::InvalidCapacity(0))
        ));
    }
}
