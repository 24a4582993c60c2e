//! Fixed-capacity set with least-recently-used eviction.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// A set that remembers at most `capacity` keys.
///
/// Adding a key marks it most recently used, including when it is already
/// present. Inserting a new key at capacity evicts the least recently used
/// one. Recency (rather than insertion order) keeps an item that keeps
/// reappearing at the edge of a polling window from being evicted and
/// yielded again.
///
/// # Example
///
/// ```
/// use reddit_rs::listing::BoundedSet;
///
/// let mut seen = BoundedSet::new(2);
/// seen.add("a");
/// seen.add("b");
/// seen.add("a"); // refresh "a"
/// seen.add("c"); // evicts "b"
/// assert!(seen.contains(&"a"));
/// assert!(!seen.contains(&"b"));
/// ```
#[derive(Debug, Clone)]
pub struct BoundedSet<K> {
    capacity: usize,
    clock: u64,
    stamps: HashMap<K, u64>,
    order: BTreeMap<u64, K>,
}

impl<K: Eq + Hash + Clone> BoundedSet<K> {
    /// Create an empty set. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            clock: 0,
            stamps: HashMap::with_capacity(capacity),
            order: BTreeMap::new(),
        }
    }

    /// Membership test; does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.stamps.contains_key(key)
    }

    /// Insert `key` as the most recently used entry.
    pub fn add(&mut self, key: K) {
        self.clock += 1;
        let stamp = self.clock;

        if let Some(old) = self.stamps.insert(key.clone(), stamp) {
            self.order.remove(&old);
        } else if self.stamps.len() > self.capacity {
            if let Some((_, evicted)) = self.order.pop_first() {
                self.stamps.remove(&evicted);
            }
        }
        self.order.insert(stamp, key);
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Returns `true` if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Maximum number of keys retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
