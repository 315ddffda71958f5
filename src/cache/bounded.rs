//! Bounded Cache Module
//!
//! Fixed-capacity LRU cache combining a HashMap index with the recency list.
//! All state sits behind a single mutex so the cache can be shared via `Arc`.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, LruList, NodeId};
use crate::error::{KvError, Result};

#[derive(Debug)]
struct CacheInner {
    /// Key -> node in the recency list
    index: HashMap<i64, NodeId>,
    /// Recency order, front = most recently used
    order: LruList,
}

// == Bounded Cache ==
/// Thread-safe LRU cache mapping integer keys to string values.
///
/// Capacity is fixed at construction. `get`, `put` and `delete` never fail and
/// only ever hold the internal lock for the duration of the call.
#[derive(Debug)]
pub struct BoundedCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

impl BoundedCache {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `KvError::Configuration` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(KvError::Configuration(
                "cache capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            inner: Mutex::new(CacheInner {
                index: HashMap::with_capacity(capacity),
                order: LruList::with_capacity(capacity),
            }),
            capacity,
        })
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: i64) -> Option<String> {
        let mut inner = self.inner.lock();
        let id = *inner.index.get(&key)?;
        inner.order.move_to_front(id);
        inner.order.get(id).map(|entry| entry.value.clone())
    }

    // == Put ==
    /// Inserts or replaces the value for `key` and marks it most recently used.
    ///
    /// Replacing a resident key never evicts. Inserting a new key into a full
    /// cache evicts exactly the least recently used entry first.
    pub fn put(&self, key: i64, value: String) {
        let mut inner = self.inner.lock();

        if let Some(&id) = inner.index.get(&key) {
            if let Some(entry) = inner.order.get_mut(id) {
                entry.replace(value);
            }
            inner.order.move_to_front(id);
            return;
        }

        if inner.order.len() >= self.capacity {
            if let Some(evicted) = inner.order.pop_back() {
                inner.index.remove(&evicted.key);
                debug!("Evicted key {} from cache", evicted.key);
            }
        }

        let id = inner.order.push_front(CacheEntry::new(key, value));
        inner.index.insert(key, id);
    }

    // == Delete ==
    /// Removes `key` if resident; absent keys are ignored.
    pub fn delete(&self, key: i64) {
        let mut inner = self.inner.lock();
        if let Some(id) = inner.index.remove(&key) {
            inner.order.remove(id);
        }
    }

    // == Inspection ==
    /// Checks residency without touching recency.
    pub fn contains(&self, key: i64) -> bool {
        self.inner.lock().index.contains_key(&key)
    }

    /// Returns the current number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resident keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<i64> {
        self.inner.lock().order.keys()
    }
}
