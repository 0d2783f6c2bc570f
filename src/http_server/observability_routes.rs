//! Observability HTTP Routes
//!
//! Readiness message at `/` and a JSON health check at `/health`.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::store_routes::StoreState;

/// Plaintext body of the readiness endpoint
pub const READY_MESSAGE: &str = "Store API is running";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stores: Option<u64>,
}

/// Create readiness and health routes
pub fn health_routes(state: Arc<StoreState>) -> Router {
    Router::new()
        .route("/", get(ready_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Readiness handler
async fn ready_handler() -> &'static str {
    READY_MESSAGE
}

/// Health check handler; reports unavailable if storage cannot be read
async fn health_handler(State(state): State<Arc<StoreState>>) -> impl IntoResponse {
    match state.blocking(|repo| repo.count()).await {
        Ok(count) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                stores: Some(count),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    stores: None,
                }),
            )
        }
    }
}
