//! # Store HTTP Server Module
//!
//! Axum server exposing the store API.
//!
//! # Endpoints
//!
//! - `/` - Readiness message (plain text)
//! - `/health` - Health check
//! - `/stores` - List and create stores
//! - `/stores/{id}` - Fetch, update and delete one store

pub mod config;
pub mod observability_routes;
pub mod server;
pub mod store_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
pub use store_routes::{store_routes, StoreState};
