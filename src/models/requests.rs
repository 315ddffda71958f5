//! Request DTOs for the key-value API
//!
//! Defines the structure of incoming request bodies and query strings.

use serde::Deserialize;

/// Body for create (POST /create) and update (PUT /update)
#[derive(Debug, Clone, Deserialize)]
pub struct KeyValueRequest {
    pub key: i64,
    pub value: String,
}

/// Body for delete (DELETE /delete) and query for read (GET /read?key=N)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct KeyRequest {
    pub key: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_request_deserialize() {
        let json = r#"{"key": 12, "value": "hello"}"#;
        let req: KeyValueRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, 12);
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_key_value_request_missing_value() {
        let json = r#"{"key": 12}"#;
        assert!(serde_json::from_str::<KeyValueRequest>(json).is_err());
    }

    #[test]
    fn test_key_request_rejects_string_key() {
        let json = r#"{"key": "twelve"}"#;
        assert!(serde_json::from_str::<KeyRequest>(json).is_err());
    }
}
