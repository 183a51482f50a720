//! API Handlers
//!
//! HTTP request handlers for the admin endpoints over the cache registry.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, CacheSummary, ClearResponse, DeleteResponse, GetResponse, HealthResponse,
    PutRequest, PutResponse, StatsResponse,
};
use crate::registry::CacheRegistry;

/// Application state shared across all handlers.
///
/// The registry is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CacheRegistry>,
}

impl AppState {
    /// Creates a new AppState around an already populated registry.
    pub fn new(registry: CacheRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Registers one JSON cache per configured dataset.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = CacheRegistry::new();
        for dataset in &config.datasets {
            registry.register::<Value>(&dataset.name, dataset.cache.clone())?;
        }
        Ok(Self::new(registry))
    }
}

/// Handler for GET /caches
///
/// Lists every cache with its settings and current size.
pub async fn list_handler(State(state): State<AppState>) -> Json<Vec<CacheSummary>> {
    let mut summaries = Vec::with_capacity(state.registry.len());
    for cache in state.registry.caches() {
        summaries.push(CacheSummary::new(
            cache.name(),
            cache.config(),
            cache.len().await,
        ));
    }
    Json(summaries)
}

/// Handler for GET /caches/:name/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let cache = state.registry.get::<Value>(&name)?;
    let value = cache
        .get(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(name, key, value)))
}

/// Handler for PUT /caches/:name/:key
///
/// Seeds or replaces one entry.
pub async fn put_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let cache = state.registry.get::<Value>(&name)?;
    cache.put(key.clone(), req.value).await;

    Ok(Json(PutResponse::new(name, key)))
}

/// Handler for DELETE /caches/:name/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let cache = state.registry.cache(&name)?;
    if !cache.clear(&key).await {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(name, key)))
}

/// Handler for DELETE /caches/:name
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearResponse>> {
    let cache = state.registry.cache(&name)?;
    let removed = cache.clear_all().await;
    info!("Cleared cache '{}' ({} entries)", name, removed);

    Ok(Json(ClearResponse::new(name, removed)))
}

/// Handler for GET /stats
pub async fn stats_all_handler(State(state): State<AppState>) -> Json<Vec<StatsResponse>> {
    let stats = state.registry.stats_all().await;
    Json(
        stats
            .into_iter()
            .map(|(name, stats)| StatsResponse::new(name, stats))
            .collect(),
    )
}

/// Handler for GET /stats/:name
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let cache = state.registry.cache(&name)?;
    let stats = cache.stats().await;

    Ok(Json(StatsResponse::new(name, stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
