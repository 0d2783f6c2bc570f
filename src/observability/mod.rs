//! Observability for the store service
//!
//! Structured logging through `tracing`. Request-level spans come from the
//! HTTP trace layer; this module only owns subscriber setup.

mod logger;

pub use logger::{build_env_filter, init_logging, LogFormat};
