//! Store Module
//!
//! The store of record behind the cache. Every call is individually atomic at
//! the store; ordering against the cache is the coordinator's job.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Durable key-value store contract.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Inserts a new row.
    ///
    /// # Errors
    /// `KvError::Conflict` if the key already exists, `KvError::Store` otherwise.
    async fn insert(&self, key: i64, value: &str) -> Result<()>;

    /// Replaces the value of an existing row.
    ///
    /// # Errors
    /// `KvError::NotFound` if the key does not exist, `KvError::Store` otherwise.
    async fn update(&self, key: i64, value: &str) -> Result<()>;

    /// Removes an existing row.
    ///
    /// # Errors
    /// `KvError::NotFound` if the key does not exist, `KvError::Store` otherwise.
    async fn delete(&self, key: i64) -> Result<()>;

    /// Fetches the value for `key`, `None` when absent.
    async fn lookup(&self, key: i64) -> Result<Option<String>>;

    /// Checks the store is reachable.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    /// Releases connections held by the store. Called once at shutdown.
    async fn close(&self) {}
}
