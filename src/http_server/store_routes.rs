//! Store HTTP Routes
//!
//! CRUD endpoints over the `stores` table. Each request runs
//! normalize -> validate/lookup -> persist -> respond, and every failure is
//! rendered in the format the client negotiated.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Router,
};

use crate::rest_api::{
    ApiError, ApiResult, BodyFormat, InboundPayload, MessageResponse, Responder, WireFormat,
    XmlRootPolicy,
};
use crate::schema::{validate_create, validate_update};
use crate::storage::{StorageResult, Store, StoreRepository};

// ==================
// Shared State
// ==================

/// Store state shared across handlers
pub struct StoreState {
    repository: Arc<dyn StoreRepository>,
    xml_roots: Arc<XmlRootPolicy>,
}

impl StoreState {
    pub fn new(repository: Arc<dyn StoreRepository>, xml_roots: XmlRootPolicy) -> Self {
        Self {
            repository,
            xml_roots: Arc::new(xml_roots),
        }
    }

    /// Responder for the format the request's `Accept` header asks for
    pub fn responder(&self, headers: &HeaderMap) -> Responder {
        Responder::new(WireFormat::from_accept(headers), Arc::clone(&self.xml_roots))
    }

    /// Run a repository call off the async runtime
    pub async fn blocking<T, F>(&self, f: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn StoreRepository) -> StorageResult<T> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || f(repository.as_ref()))
            .await
            .map_err(|e| ApiError::Internal(format!("storage task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}

// ==================
// Store Routes
// ==================

/// Create store routes
pub fn store_routes(state: Arc<StoreState>) -> Router {
    Router::new()
        .route("/stores", get(list_stores_handler).post(create_store_handler))
        .route(
            "/stores/:id",
            get(get_store_handler)
                .put(update_store_handler)
                .delete(delete_store_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Path ids that are not integers cannot match a row and read as not found
fn parse_store_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>().map_err(|_| ApiError::NotFound)
}

fn normalize(headers: &HeaderMap, body: &[u8]) -> ApiResult<InboundPayload> {
    InboundPayload::normalize(BodyFormat::from_content_type(headers), body)
}

// ==================
// Handlers
// ==================

async fn list_stores_handler(
    State(state): State<Arc<StoreState>>,
    headers: HeaderMap,
) -> Response {
    let result = state.blocking(|repo| repo.list()).await;
    state.responder(&headers).result(StatusCode::OK, result)
}

async fn create_store_handler(
    State(state): State<Arc<StoreState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = create_store(&state, &headers, &body).await;
    state.responder(&headers).result(StatusCode::CREATED, result)
}

async fn get_store_handler(
    State(state): State<Arc<StoreState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let result = get_store(&state, &id).await;
    state.responder(&headers).result(StatusCode::OK, result)
}

async fn update_store_handler(
    State(state): State<Arc<StoreState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = update_store(&state, &id, &headers, &body).await;
    state.responder(&headers).result(StatusCode::OK, result)
}

async fn delete_store_handler(
    State(state): State<Arc<StoreState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let result = delete_store(&state, &id).await;
    state.responder(&headers).result(StatusCode::OK, result)
}

// ==================
// Operations
// ==================

async fn create_store(state: &StoreState, headers: &HeaderMap, body: &[u8]) -> ApiResult<Store> {
    let payload = normalize(headers, body)?;
    let new_store = validate_create(payload.fields())?;

    let store = state.blocking(move |repo| repo.insert(new_store)).await?;
    tracing::info!(id = store.id, "created store");
    Ok(store)
}

async fn get_store(state: &StoreState, id: &str) -> ApiResult<Store> {
    let id = parse_store_id(id)?;
    state
        .blocking(move |repo| repo.get(id))
        .await?
        .ok_or(ApiError::NotFound)
}

async fn update_store(
    state: &StoreState,
    id: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> ApiResult<Store> {
    let payload = normalize(headers, body)?;
    let id = parse_store_id(id)?;

    // existence is reported before field violations
    if state.blocking(move |repo| repo.get(id)).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let patch = validate_update(payload.fields())?;
    let store = state
        .blocking(move |repo| repo.update(id, patch))
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id = store.id, "updated store");
    Ok(store)
}

async fn delete_store(state: &StoreState, id: &str) -> ApiResult<MessageResponse> {
    let id = parse_store_id(id)?;
    if !state.blocking(move |repo| repo.delete(id)).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(id, "deleted store");
    Ok(MessageResponse::new("Store deleted successfully"))
}
