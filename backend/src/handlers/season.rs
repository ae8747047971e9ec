//! Season HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::services::season::{ClassifyInput, ResolveCountInput, SeasonService};
use crate::AppState;

/// Classify a tree's production phase
pub async fn classify_season(
    State(state): State<AppState>,
    Json(input): Json<ClassifyInput>,
) -> impl IntoResponse {
    let service = SeasonService::new(state.config.engine.harvest_calendar);

    let result = service.classify(input, Utc::now());
    (StatusCode::OK, Json(result))
}

/// Resolve a tree's prior-season count from a breakdown map
pub async fn resolve_season_count(
    State(state): State<AppState>,
    Json(input): Json<ResolveCountInput>,
) -> impl IntoResponse {
    let service = SeasonService::new(state.config.engine.harvest_calendar);

    (StatusCode::OK, Json(service.resolve_count(&input)))
}
