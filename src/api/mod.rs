//! API Module
//!
//! HTTP handlers and routing for the key-value REST API.
//!
//! # Endpoints
//! - `POST /create` - Insert a new key
//! - `GET /read?key=N` - Read a key, from the cache when possible
//! - `PUT /update` - Replace the value of an existing key
//! - `DELETE /delete` - Remove an existing key
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;
pub mod server;

pub use handlers::*;
pub use routes::create_router;
pub use server::serve;
