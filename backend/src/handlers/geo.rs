//! Tree relocation and zone area HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::geo::{GeoService, RelocationInput, ZoneAreaInput};
use crate::AppState;

/// Validate a manual relocation before the caller persists it
pub async fn validate_tree_relocation(
    State(state): State<AppState>,
    Json(input): Json<RelocationInput>,
) -> impl IntoResponse {
    let service = GeoService::new(state.config.engine.max_relocation_meters);

    match service.check_relocation(&input) {
        Ok(accepted) => (StatusCode::OK, Json(accepted)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Estimate a zone's area from its boundary
pub async fn estimate_zone_area(
    State(state): State<AppState>,
    Json(input): Json<ZoneAreaInput>,
) -> impl IntoResponse {
    let service = GeoService::new(state.config.engine.max_relocation_meters);

    (StatusCode::OK, Json(service.zone_area(&input)))
}
