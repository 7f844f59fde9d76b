//! Engine handlers: simulation, calendar and defaults

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use chrono::Datelike;
use serde::Serialize;

use crate::{AppError, AppState};
use hearth_core::calendar::build_weeks_for_year;
use hearth_core::coerce::clamp_year;
use hearth_core::models::{Snapshot, Week};
use hearth_core::{simulate, Simulation};

use super::configs::parse_document;

/// Current calendar year (local time)
pub(crate) fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Weeks of one year
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub year: i32,
    pub week_count: usize,
    pub weeks: Vec<Week>,
}

/// GET /api/health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/defaults - Default snapshot for the current year
pub async fn get_defaults(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.defaults.snapshot(current_year()))
}

/// GET /api/configs/:name/simulation - Simulate a stored configuration
pub async fn simulate_config(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Simulation>, AppError> {
    let snapshot = state
        .db
        .get_config(&name)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Not found"))?;
    Ok(Json(simulate(&snapshot)))
}

/// POST /api/simulate - Simulate the snapshot document in the request body
pub async fn simulate_document(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Simulation>, AppError> {
    let snapshot = parse_document(&state, &body)?;
    Ok(Json(simulate(&snapshot)))
}

/// GET /api/calendar/:year - ISO weeks of a year (clamped to the supported range)
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Json<CalendarResponse> {
    let year = clamp_year(year);
    let weeks = build_weeks_for_year(year, None, state.defaults.week_weight);
    Json(CalendarResponse {
        year,
        week_count: weeks.len(),
        weeks,
    })
}
