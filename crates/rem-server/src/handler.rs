use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use serde_json::{json, Value};

use rem_engine::{Draft, ItemId, Page, PageRequest, DEFAULT_OFFSET};
use rem_loader::dataset_name;

use crate::error::{ServerError, ServerResult};
use crate::session::CurrentSession;
use crate::state::AppState;

pub const INIT_MESSAGE: &str = "The session is initiated with the default dataset(s).";
pub const ITEM_NOT_FOUND_MESSAGE: &str = "The item is not found.";

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<Value> {
    let datasets: Vec<String> = state
        .engine
        .default_dataset()
        .iter()
        .filter_map(|source| dataset_name(source))
        .collect();
    Json(json!({
        "name": "rem-server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_prefix": state.config.normalized_prefix(),
        "datasets": datasets,
        "sessions": state.sessions.len(),
    }))
}

/// `GET {prefix}/init`: reload the default datasets into the session.
pub async fn init_handler(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> ServerResult<Json<Value>> {
    let store = session.lock().await;
    state.engine.init(&*store)?;
    let sources: Vec<String> = state
        .engine
        .default_dataset()
        .iter()
        .map(|source| source.display().to_string())
        .collect();
    Ok(Json(json!({
        "message": INIT_MESSAGE,
        "dataset": sources,
    })))
}

/// `GET {prefix}/{dataset}?offset=&limit=`: one page of a dataset.
pub async fn list_handler(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(dataset): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Page> {
    let request = page_request(&params, state.config.default_limit);
    let store = session.lock().await;
    Json(state.engine.list(&*store, &dataset, request))
}

/// `GET {prefix}/{dataset}/{id}`.
pub async fn get_item_handler(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path((dataset, id)): Path<(String, String)>,
) -> ServerResult<Response> {
    let id = parse_id(&id)?;
    let store = session.lock().await;
    let response = match state.engine.get_item(&*store, &dataset, id) {
        Some(item) => Json(item).into_response(),
        None => Json(json!({ "message": ITEM_NOT_FOUND_MESSAGE })).into_response(),
    };
    Ok(response)
}

/// `POST {prefix}/{dataset}`: store the body under a new id.
pub async fn create_item_handler(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(dataset): Path<String>,
    body: Bytes,
) -> ServerResult<Response> {
    let draft = parse_draft(&body)?;
    let store = session.lock().await;
    let item = state.engine.add_item(&*store, &dataset, draft);
    Ok(Json(item).into_response())
}

/// `PUT {prefix}/{dataset}/{id}`: replace or insert the body under `id`.
pub async fn upsert_item_handler(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path((dataset, id)): Path<(String, String)>,
    body: Bytes,
) -> ServerResult<Response> {
    let id = parse_id(&id)?;
    let draft = parse_draft(&body)?;
    let store = session.lock().await;
    let item = state.engine.upsert_item(&*store, &dataset, id, draft);
    Ok(Json(item).into_response())
}

/// `DELETE {prefix}/{dataset}/{id}`.
pub async fn delete_item_handler(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path((dataset, id)): Path<(String, String)>,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&id)?;
    let store = session.lock().await;
    state.engine.delete_item(&*store, &dataset, id);
    Ok(Json(json!({
        "message": format!("Item id '{id}' was deleted from dataset '{dataset}'."),
    })))
}

/// Anything the API does not route.
pub async fn unsupported_handler() -> ServerError {
    ServerError::RouteUnsupported
}

/// Non-integer ids do not name a route.
fn parse_id(raw: &str) -> ServerResult<ItemId> {
    raw.parse().map_err(|_| ServerError::RouteUnsupported)
}

fn parse_draft(body: &[u8]) -> ServerResult<Draft> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ServerError::MalformedInput)?;
    Draft::from_value(value).map_err(|_| ServerError::MalformedInput)
}

/// Missing or unparsable `offset` / `limit` fall back to the defaults.
fn page_request(params: &HashMap<String, String>, default_limit: usize) -> PageRequest {
    let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<usize>().ok());
    PageRequest::new(
        number("offset").unwrap_or(DEFAULT_OFFSET),
        number("limit").unwrap_or(default_limit),
    )
}
