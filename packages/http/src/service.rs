//! The opensled HTTP service.
//!
//! One process serves any number of databases: every request names its
//! database path and the service resolves it through a shared
//! [`Registry`], so concurrent requests against the same path share one
//! root handle.
//!
//! Values cross the boundary as base64-encoded tagged blobs; see
//! [`crate::types`] for the iteration wire shape.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use opensled_codec::{blob_from_base64, blob_to_base64, decode, encode};
use opensled_store::{Error as StoreError, IterOptions, KeyPath, Registry, StoreHandle};

use crate::params::QueryParams;
use crate::types::WireItem;

/// Shared service state: the registry resolving database paths to root
/// handles.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
}

/// A handler failure mapped to an HTTP status.
///
/// Caller mistakes (missing parameters, bad key shapes, malformed blobs)
/// answer 400; engine failures answer 500. The body is the plain error
/// message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = match &e {
            StoreError::KeyShape { .. } | StoreError::Codec(_) => StatusCode::BAD_REQUEST,
            StoreError::AlreadyOpen { .. } | StoreError::Engine(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError {
            status,
            message: e.to_string(),
        }
    }
}

impl From<opensled_codec::CodecError> for ApiError {
    fn from(e: opensled_codec::CodecError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, message = %self.message, "request failed");
        (self.status, self.message).into_response()
    }
}

/// The service router. Exposed separately from [`serve`] so tests can
/// drive it on an ephemeral listener.
pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/getitem", get(getitem))
        .route("/setitem", post(setitem))
        .route("/delitem", delete(delitem))
        .route("/dblen", get(dblen))
        .route("/iterator", get(iterator))
        .route("/repr", get(repr))
        .with_state(AppState { registry })
}

/// Serve the facade on an already-bound listener until the task is
/// dropped.
pub async fn serve(
    listener: tokio::net::TcpListener,
    registry: Arc<Registry>,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "opensled service listening");
    axum::serve(listener, router(registry)).await
}

impl AppState {
    fn open(&self, params: &QueryParams) -> Result<Arc<StoreHandle>, ApiError> {
        let dbpath = params
            .one("dbpath")
            .ok_or_else(|| ApiError::bad_request("missing 'dbpath' parameter"))?;
        Ok(self.registry.get_instance(dbpath)?)
    }
}

/// The value key named by a request: its `prefixes` in wire order, then
/// `key` as the leaf.
fn value_key(params: &QueryParams) -> Result<KeyPath, ApiError> {
    let leaf = params
        .one("key")
        .ok_or_else(|| ApiError::bad_request("missing 'key' parameter"))?;
    let mut segments = params.all("prefixes");
    segments.push(leaf.to_string());
    Ok(KeyPath::Value(segments))
}

fn iter_options(params: &QueryParams) -> IterOptions {
    IterOptions {
        prefixes: params.all("prefixes"),
        starting_by: params.all("starting_by"),
        include_key: params.flag("include_key", true),
        include_value: params.flag("include_value", true),
    }
}

/// Point lookup. Hit: the value's tagged blob, base64-encoded. Miss: an
/// empty body.
async fn getitem(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<String, ApiError> {
    let params = QueryParams::parse(raw.as_deref());
    let handle = state.open(&params)?;
    match handle.get(&value_key(&params)?)? {
        Some(value) => Ok(blob_to_base64(&encode(&value)?)),
        None => Ok(String::new()),
    }
}

/// Write the base64-encoded tagged blob in the body at the named key,
/// answering the flat key as an acknowledgement. The blob is decoded
/// before storage, so a malformed payload answers 400 and never lands in
/// the engine.
async fn setitem(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    body: String,
) -> Result<String, ApiError> {
    let params = QueryParams::parse(raw.as_deref());
    let handle = state.open(&params)?;
    let value = decode(&blob_from_base64(body.trim())?)?;
    let key = value_key(&params)?;
    handle.put(&key, &value)?;
    Ok(key.flat())
}

/// Point delete, answering the flat key. Deleting a missing key is not an
/// error.
async fn delitem(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<String, ApiError> {
    let params = QueryParams::parse(raw.as_deref());
    let handle = state.open(&params)?;
    let key = value_key(&params)?;
    handle.delete(&key)?;
    Ok(key.flat())
}

/// Count entries matching the filters, as a plain text integer.
async fn dblen(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<String, ApiError> {
    let params = QueryParams::parse(raw.as_deref());
    let handle = state.open(&params)?;
    let count = handle.count(&iter_options(&params))?;
    Ok(count.to_string())
}

/// Shaped iteration, materialized into one JSON list.
async fn iterator(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<WireItem>>, ApiError> {
    let params = QueryParams::parse(raw.as_deref());
    let handle = state.open(&params)?;
    let mut items = Vec::new();
    for item in handle.iter(&iter_options(&params))? {
        items.push(WireItem::from_item(&item?).map_err(|e| ApiError::bad_request(e.to_string()))?);
    }
    Ok(Json(items))
}

/// Debug representation of the addressed view.
async fn repr(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<String, ApiError> {
    let params = QueryParams::parse(raw.as_deref());
    let handle = state.open(&params)?;
    let prefixes = params.all("prefixes");
    if prefixes.is_empty() {
        return Ok(handle.describe());
    }
    Ok(handle.sub_store(&KeyPath::SubStore(prefixes))?.describe())
}
