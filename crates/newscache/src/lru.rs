//! LRU (Least Recently Used) cache implementation
//!
//! Entries live in a slot arena threaded by an index-linked recency trail:
//! the head is the least recently used entry, the tail the most recent.

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;
use tracing::debug;

use crate::arena::SlotArena;
use crate::error::{Error, Result};
use crate::traits::Cache;

/// Node in the recency trail
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: SlotArena<Node<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is zero. Use [`LruCache::try_new`] for
    /// user-supplied values.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            nodes: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// Create a new LRU cache, rejecting a zero capacity
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self::new(capacity))
    }

    /// Remove a key and return its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.nodes.remove(idx).map(|node| node.value)
    }

    /// Peek at the entry that would be evicted next, without touching it
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.head
            .and_then(|idx| self.nodes.get(idx))
            .map(|node| (&node.key, &node.value))
    }

    fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return; // Already most recent
        }

        self.unlink(idx);
        self.push_back(idx);
    }

    fn push_back(&mut self, idx: usize) {
        let old_tail = self.tail;

        if let Some(node) = self.nodes.get_mut(idx) {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = self.nodes.get_mut(tail_idx) {
                    tail.next = Some(idx);
                }
            }
            None => {
                self.head = Some(idx);
            }
        }

        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes.get(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.nodes.get_mut(prev_idx) {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.nodes.get_mut(next_idx) {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(node) = self.nodes.get_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    /// Keys from least to most recently used
    #[cfg(test)]
    fn trail(&self) -> Vec<K> {
        let mut keys = Vec::new();
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.nodes.get(idx).expect("dangling trail link");
            keys.push(node.key.clone());
            cursor = node.next;
        }
        keys
    }

    /// Verify the map, arena and trail agree with each other
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.nodes.get(idx).expect("dangling trail link");
            assert_eq!(node.prev, prev, "broken back link");
            assert_eq!(self.map.get(&node.key), Some(&idx), "trail key missing from map");
            count += 1;
            prev = Some(idx);
            cursor = node.next;
        }
        assert_eq!(self.tail, prev, "tail does not end the trail");
        assert_eq!(count, self.map.len());
        assert_eq!(count, self.nodes.len());
        assert!(self.map.len() <= self.capacity);
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_back(idx);
        self.nodes.get(idx).map(|node| &node.value)
    }

    fn put(&mut self, key: K, value: V) {
        if let Some(&idx) = self.map.get(&key) {
            // Update existing
            if let Some(node) = self.nodes.get_mut(idx) {
                node.value = value;
            }
            self.move_to_back(idx);
            return;
        }

        if self.map.len() >= self.capacity {
            self.evict();
        }

        let idx = self.nodes.insert(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.push_back(idx);
        self.map.insert(key, idx);
    }

    fn delete(&mut self, key: &K) {
        self.remove(key);
    }

    fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn evict(&mut self) {
        let Some(idx) = self.head else {
            return;
        };

        self.unlink(idx);
        if let Some(node) = self.nodes.remove(idx) {
            self.map.remove(&node.key);
            debug!(len = self.map.len(), capacity = self.capacity, "evicted least recently used entry");
        }
    }

    fn values(&self) -> Vec<&V> {
        self.nodes.iter().map(|node| &node.value).collect()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }
}
