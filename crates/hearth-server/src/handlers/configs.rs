//! Named configuration handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::{AppError, AppState, SuccessResponse};
use hearth_core::models::{ConfigSummary, Snapshot};
use hearth_core::snapshot::import_value;

use super::simulation::current_year;

/// Response body for a successful save
#[derive(Debug, Serialize)]
pub struct SaveConfigResponse {
    pub success: bool,
    /// Version now stored; send it back in `If-Match` on the next save
    pub version: i64,
}

/// Parse an `If-Match` header into an expected version
///
/// Accepts `3`, `"3"` and `W/"3"`.
fn expected_version(headers: &HeaderMap) -> Result<Option<i64>, AppError> {
    let Some(value) = headers.get(header::IF_MATCH) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid If-Match header"))?
        .trim();
    let raw = raw.strip_prefix("W/").unwrap_or(raw).trim_matches('"');

    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::bad_request("If-Match must be a configuration version"))
}

/// Parse a request body as a snapshot document
pub(crate) fn parse_document(state: &AppState, body: &Bytes) -> Result<Snapshot, AppError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| AppError::bad_request("Invalid JSON"))?;
    import_value(value, &state.defaults, current_year()).map_err(AppError::from_core)
}

/// GET /api/configs - All stored configurations, keyed by name
pub async fn list_configs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Snapshot>>, AppError> {
    Ok(Json(state.db.list_configs()?))
}

/// GET /api/configs/summary - Name, version and last update of each configuration
pub async fn list_config_summaries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConfigSummary>>, AppError> {
    Ok(Json(state.db.list_config_summaries()?))
}

/// GET /api/configs/:name - Get a stored configuration
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Snapshot>, AppError> {
    state
        .db
        .get_config(&name)
        .map_err(AppError::from_core)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Not found"))
}

/// POST|PUT /api/configs/:name - Store a configuration
///
/// With `If-Match: <version>`, the save is rejected with 409 when the stored
/// version differs.
pub async fn save_config(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SaveConfigResponse>, AppError> {
    let expected = expected_version(&headers)?;
    let snapshot = parse_document(&state, &body)?;

    let version = state
        .db
        .save_config(&name, &snapshot, expected)
        .map_err(AppError::from_core)?;

    info!("Configuration '{}' saved via API (version {})", name, version);
    Ok(Json(SaveConfigResponse {
        success: true,
        version,
    }))
}

/// DELETE /api/configs/:name - Delete a configuration (succeeds if absent)
pub async fn delete_config(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_config(&name).map_err(AppError::from_core)?;
    Ok(Json(SuccessResponse::done()))
}
