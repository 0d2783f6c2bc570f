//! storefront - a small HTTP service for store records
//!
//! CRUD over a single SQLite table with JSON and XML request and response
//! bodies, chosen by `Content-Type` and `Accept`.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod schema;
pub mod storage;
