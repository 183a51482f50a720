//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, delete_handler, get_handler, health_handler, list_handler, put_handler,
    stats_all_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /caches` - List caches with their settings
/// - `DELETE /caches/:name` - Clear every entry of a cache
/// - `GET /caches/:name/:key` - Read an entry
/// - `PUT /caches/:name/:key` - Seed or replace an entry
/// - `DELETE /caches/:name/:key` - Clear one entry
/// - `GET /stats` - Statistics of every cache
/// - `GET /stats/:name` - Statistics of one cache
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/caches", get(list_handler))
        .route("/caches/:name", delete(clear_cache_handler))
        .route(
            "/caches/:name/:key",
            get(get_handler).put(put_handler).delete(delete_handler),
        )
        .route("/stats", get(stats_all_handler))
        .route("/stats/:name", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
