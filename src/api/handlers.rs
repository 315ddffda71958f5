//! API Handlers
//!
//! HTTP request handlers for each key-value endpoint. Handlers only decode the
//! request and translate the coordinator's outcome into a status code.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::cache::BoundedCache;
use crate::config::Config;
use crate::coordinator::{CacheCoordinator, Outcome};
use crate::error::{KvError, Result};
use crate::models::{HealthResponse, KeyRequest, KeyValueRequest, MutationResponse, ReadResponse};
use crate::store::KvStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<CacheCoordinator>,
}

impl AppState {
    pub fn new(coordinator: CacheCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }

    /// Builds the cache from configuration and wires it to `store`.
    ///
    /// # Errors
    /// `KvError::Configuration` if the configured capacity is invalid.
    pub fn from_config(config: &Config, store: Arc<dyn KvStore>) -> Result<Self> {
        let cache = Arc::new(BoundedCache::new(config.cache_capacity)?);
        Ok(Self::new(CacheCoordinator::new(cache, store)))
    }
}

fn decode_json<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| KvError::InvalidRequest(rejection.body_text()))
}

/// Handler for POST /create
pub async fn create_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<KeyValueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let req = decode_json(payload)?;
    state.coordinator.create(req.key, req.value).await?;

    Ok((StatusCode::CREATED, Json(MutationResponse::created(req.key))))
}

/// Handler for GET /read?key=N
pub async fn read_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<KeyRequest>, QueryRejection>,
) -> Result<Json<ReadResponse>> {
    let Query(KeyRequest { key }) =
        query.map_err(|rejection| KvError::InvalidRequest(rejection.body_text()))?;

    match state.coordinator.read(key).await? {
        Outcome::Found { value, source } => Ok(Json(ReadResponse::new(key, value, source))),
        other => Err(KvError::Store(format!(
            "unexpected read outcome for key {}: {:?}",
            key, other
        ))),
    }
}

/// Handler for PUT /update
pub async fn update_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<KeyValueRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>> {
    let req = decode_json(payload)?;
    state.coordinator.update(req.key, req.value).await?;

    Ok(Json(MutationResponse::updated(req.key)))
}

/// Handler for DELETE /delete
pub async fn delete_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<KeyRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>> {
    let KeyRequest { key } = decode_json(payload)?;
    state.coordinator.delete(key).await?;

    Ok(Json(MutationResponse::deleted(key)))
}

/// Handler for GET /health
///
/// Fails with 500 when the store of record is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    state.coordinator.health_check().await?;
    Ok(Json(HealthResponse::healthy()))
}
