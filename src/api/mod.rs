//! API Module
//!
//! Admin HTTP surface over the cache registry.
//!
//! # Endpoints
//! - `GET /caches` - List caches
//! - `GET|PUT|DELETE /caches/:name/:key` - Read, seed or clear one entry
//! - `DELETE /caches/:name` - Clear a cache
//! - `GET /stats`, `GET /stats/:name` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
