//! Cache Coordinator
//!
//! Orders every operation between the bounded cache and the store of record so
//! that the cache never holds a value the store has not confirmed.
//!
//! | Operation | Store step        | Cache step (only after store success) |
//! |-----------|-------------------|---------------------------------------|
//! | create    | insert            | put                                   |
//! | read      | lookup on miss    | get, then put on store hit            |
//! | update    | update            | put                                   |
//! | delete    | delete            | delete                                |
//!
//! Writers hold the exclusive side of a write gate across "store call, then cache
//! call". A read that misses the cache holds the shared side across "lookup, then
//! populate", so reads stay concurrent with one another but a populate can never
//! re-insert a key whose delete is in flight. The gate is separate from the
//! cache's own mutex, which is never held across a store call.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::BoundedCache;
use crate::error::{KvError, Result};
use crate::store::KvStore;

/// Where a read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Store,
}

/// Successful result of a coordinated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Deleted,
    Found { value: String, source: Source },
}

// == Cache Coordinator ==
pub struct CacheCoordinator {
    cache: Arc<BoundedCache>,
    store: Arc<dyn KvStore>,
    write_gate: RwLock<()>,
}

impl CacheCoordinator {
    pub fn new(cache: Arc<BoundedCache>, store: Arc<dyn KvStore>) -> Self {
        Self {
            cache,
            store,
            write_gate: RwLock::new(()),
        }
    }

    pub fn cache(&self) -> &Arc<BoundedCache> {
        &self.cache
    }

    /// Reports whether the store of record is reachable.
    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }

    // == Create ==
    /// Inserts into the store, then caches the value.
    ///
    /// # Errors
    /// `KvError::Conflict` if the key exists; the cache is left untouched on any error.
    pub async fn create(&self, key: i64, value: String) -> Result<Outcome> {
        let _gate = self.write_gate.write().await;

        self.store.insert(key, &value).await?;
        self.cache.put(key, value);

        debug!("Created key {}", key);
        Ok(Outcome::Created)
    }

    // == Read ==
    /// Serves from the cache, falling back to the store and populating on a store hit.
    ///
    /// # Errors
    /// `KvError::NotFound` if neither cache nor store holds the key.
    pub async fn read(&self, key: i64) -> Result<Outcome> {
        if let Some(value) = self.cache.get(key) {
            debug!("Cache hit for key {}", key);
            return Ok(Outcome::Found {
                value,
                source: Source::Cache,
            });
        }

        let _gate = self.write_gate.read().await;

        match self.store.lookup(key).await? {
            Some(value) => {
                self.cache.put(key, value.clone());
                debug!("Cache miss for key {}, populated from store", key);
                Ok(Outcome::Found {
                    value,
                    source: Source::Store,
                })
            }
            None => {
                debug!("Key {} absent from cache and store", key);
                Err(KvError::NotFound(key))
            }
        }
    }

    // == Update ==
    /// Updates the store row, then refreshes the cached value.
    ///
    /// # Errors
    /// `KvError::NotFound` if the key does not exist; the cache is left untouched.
    pub async fn update(&self, key: i64, value: String) -> Result<Outcome> {
        let _gate = self.write_gate.write().await;

        self.store.update(key, &value).await?;
        self.cache.put(key, value);

        debug!("Updated key {}", key);
        Ok(Outcome::Updated)
    }

    // == Delete ==
    /// Deletes the store row, then evicts the key from the cache.
    ///
    /// # Errors
    /// `KvError::NotFound` if the key does not exist; the cache is left untouched.
    pub async fn delete(&self, key: i64) -> Result<Outcome> {
        let _gate = self.write_gate.write().await;

        self.store.delete(key).await?;
        self.cache.delete(key);

        debug!("Deleted key {}", key);
        Ok(Outcome::Deleted)
    }
}

impl std::fmt::Debug for CacheCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheCoordinator")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
