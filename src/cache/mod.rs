//! Cache Module
//!
//! Provides the bounded in-memory LRU cache that fronts the store of record.

mod bounded;
mod entry;
mod lru;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use lru::{LruList, NodeId};
