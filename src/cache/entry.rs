//! Cache Entry Module
//!
//! Defines the unit of data held by the bounded cache.

// == Cache Entry ==
/// A single resident key-value pair.
///
/// The key is fixed once the entry exists; the value is replaced in place on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Key, immutable after creation
    pub key: i64,
    /// The stored value
    pub value: String,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(key: i64, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    // == Replace ==
    /// Replaces the value, returning the previous one.
    pub fn replace(&mut self, value: String) -> String {
        std::mem::replace(&mut self.value, value)
    }
}
