//! KV Cache Server - key-value HTTP service with a bounded read-aside cache
//!
//! Writes go to the store of record first; the LRU cache only ever reflects
//! values the store has confirmed.

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::BoundedCache;
pub use config::Config;
pub use coordinator::{CacheCoordinator, Outcome, Source};
pub use error::KvError;
pub use store::{KvStore, MemoryStore, PgStore};
