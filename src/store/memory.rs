//! In-memory store of record.
//!
//! Backs the `memory` store backend and the test suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KvStore;
use crate::error::{KvError, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<i64, String>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `lookup` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// While set, every operation fails with `KvError::Store`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Reads a row directly, bypassing lookup accounting.
    pub async fn row(&self, key: i64) -> Option<String> {
        self.rows.read().await.get(&key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(KvError::Store("memory store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn insert(&self, key: i64, value: &str) -> Result<()> {
        self.check_available()?;
        let mut rows = self.rows.write().await;
        if rows.contains_key(&key) {
            return Err(KvError::Conflict(key));
        }
        rows.insert(key, value.to_string());
        Ok(())
    }

    async fn update(&self, key: i64, value: &str) -> Result<()> {
        self.check_available()?;
        let mut rows = self.rows.write().await;
        match rows.get_mut(&key) {
            Some(existing) => {
                *existing = value.to_string();
                Ok(())
            }
            None => Err(KvError::NotFound(key)),
        }
    }

    async fn delete(&self, key: i64) -> Result<()> {
        self.check_available()?;
        match self.rows.write().await.remove(&key) {
            Some(_) => Ok(()),
            None => Err(KvError::NotFound(key)),
        }
    }

    async fn lookup(&self, key: i64) -> Result<Option<String>> {
        self.check_available()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.read().await.get(&key).cloned())
    }

    async fn health_check(&self) -> Result<()> {
        self.check_available()
    }

    async fn close(&self) {
        self.set_unavailable(true);
    }
}
