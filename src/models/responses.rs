//! Response DTOs for the key-value API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::coordinator::Source;

/// Response body for a successful read (GET /read)
#[derive(Debug, Clone, Serialize)]
pub struct ReadResponse {
    pub key: i64,
    pub value: String,
    /// Whether the value came from the cache or the store
    pub source: Source,
}

impl ReadResponse {
    pub fn new(key: i64, value: impl Into<String>, source: Source) -> Self {
        Self {
            key,
            value: value.into(),
            source,
        }
    }
}

/// Response body for create, update and delete
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    /// Success message
    pub message: String,
    /// The key that was mutated
    pub key: i64,
}

impl MutationResponse {
    pub fn created(key: i64) -> Self {
        Self::with_verb("Created", key)
    }

    pub fn updated(key: i64) -> Self {
        Self::with_verb("Updated", key)
    }

    pub fn deleted(key: i64) -> Self {
        Self::with_verb("Deleted", key)
    }

    fn with_verb(verb: &str, key: i64) -> Self {
        Self {
            message: format!("{} key {}", verb, key),
            key,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_response_serialize() {
        let resp = ReadResponse::new(4, "four", Source::Cache);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], 4);
        assert_eq!(json["value"], "four");
        assert_eq!(json["source"], "cache");
    }

    #[test]
    fn test_read_response_store_source() {
        let resp = ReadResponse::new(4, "four", Source::Store);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["source"], "store");
    }

    #[test]
    fn test_mutation_response_messages() {
        assert_eq!(MutationResponse::created(1).message, "Created key 1");
        assert_eq!(MutationResponse::updated(2).message, "Updated key 2");
        assert_eq!(MutationResponse::deleted(3).message, "Deleted key 3");
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
