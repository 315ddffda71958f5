//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles against the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use kv_cache_server::{
    api::create_router, AppState, BoundedCache, CacheCoordinator, KvStore, MemoryStore,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    cache: Arc<BoundedCache>,
}

fn create_test_app(capacity: usize) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(BoundedCache::new(capacity).unwrap());
    let coordinator = CacheCoordinator::new(cache.clone(), store.clone());
    TestApp {
        router: create_router(AppState::new(coordinator)),
        store,
        cache,
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Create Endpoint Tests ==

#[tokio::test]
async fn test_create_endpoint_success() {
    let app = create_test_app(5);

    let (status, json) = send(&app.router, "POST", "/create", Some(r#"{"key":1,"value":"x"}"#)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["key"], 1);
    assert!(json["message"].as_str().unwrap().contains("Created key 1"));
    assert_eq!(app.store.row(1).await, Some("x".to_string()));
    assert_eq!(app.cache.get(1), Some("x".to_string()));
}

#[tokio::test]
async fn test_create_endpoint_conflict() {
    let app = create_test_app(5);
    app.store.insert(1, "durable").await.unwrap();

    let (status, json) = send(&app.router, "POST", "/create", Some(r#"{"key":1,"value":"x"}"#)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json.get("error").is_some());
    assert!(!app.cache.contains(1), "failed create must not populate the cache");

    let (status, json) = send(&app.router, "GET", "/read?key=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "durable");
    assert_eq!(json["source"], "store");
}

#[tokio::test]
async fn test_create_endpoint_invalid_json() {
    let app = create_test_app(5);

    let (status, json) = send(&app.router, "POST", "/create", Some(r#"{"key":"one"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid request"));
    assert!(app.store.is_empty().await);
}

// == Read Endpoint Tests ==

#[tokio::test]
async fn test_read_endpoint_sources() {
    let app = create_test_app(5);
    app.store.insert(8, "cold").await.unwrap();

    let (status, json) = send(&app.router, "GET", "/read?key=8", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], 8);
    assert_eq!(json["value"], "cold");
    assert_eq!(json["source"], "store");

    let (status, json) = send(&app.router, "GET", "/read?key=8", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "cache");
    assert_eq!(app.store.lookup_count(), 1);
}

#[tokio::test]
async fn test_read_endpoint_not_found() {
    let app = create_test_app(5);

    let (status, json) = send(&app.router, "GET", "/read?key=404", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("404"));
    assert!(app.cache.is_empty());
}

#[tokio::test]
async fn test_read_endpoint_invalid_key() {
    let app = create_test_app(5);

    let (status, json) = send(&app.router, "GET", "/read?key=abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_read_endpoint_store_failure() {
    let app = create_test_app(5);
    app.store.set_unavailable(true);

    let (status, _) = send(&app.router, "GET", "/read?key=1", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// == Update Endpoint Tests ==

#[tokio::test]
async fn test_update_endpoint_missing_key() {
    let app = create_test_app(5);

    let (status, _) = send(&app.router, "PUT", "/update", Some(r#"{"key":3,"value":"y"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!app.cache.contains(3));
}

// == Delete Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_missing_key() {
    let app = create_test_app(5);

    let (status, _) = send(&app.router, "DELETE", "/delete", Some(r#"{"key":3}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Full Lifecycle ==

#[tokio::test]
async fn test_full_lifecycle() {
    let app = create_test_app(5);

    let (status, _) = send(&app.router, "POST", "/create", Some(r#"{"key":1,"value":"x"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(&app.router, "GET", "/read?key=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "x");
    assert_eq!(json["source"], "cache");
    assert_eq!(app.store.lookup_count(), 0);

    let (status, json) = send(&app.router, "PUT", "/update", Some(r#"{"key":1,"value":"y"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("Updated key 1"));
    assert_eq!(app.cache.get(1), Some("y".to_string()));

    let (status, json) = send(&app.router, "DELETE", "/delete", Some(r#"{"key":1}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("Deleted key 1"));
    assert!(!app.cache.contains(1));

    let (status, _) = send(&app.router, "GET", "/read?key=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.lookup_count(), 1);
    assert!(!app.cache.contains(1));
}

#[tokio::test]
async fn test_eviction_through_api() {
    let app = create_test_app(2);

    for key in 1..=3 {
        let body = format!(r#"{{"key":{},"value":"v{}"}}"#, key, key);
        let (status, _) = send(&app.router, "POST", "/create", Some(body.as_str())).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    assert_eq!(app.cache.len(), 2);
    assert!(!app.cache.contains(1));

    let (status, json) = send(&app.router, "GET", "/read?key=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "v1");
    assert_eq!(json["source"], "store");
}

// == Health Endpoint ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(5);

    let (status, json) = send(&app.router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
