//! Route definitions for the orchard engine service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/season", season_routes())
        .nest("/trees", tree_routes())
        .nest("/zones", zone_routes())
}

/// Season phase and breakdown routes
fn season_routes() -> Router<AppState> {
    Router::new()
        .route("/classify", post(handlers::classify_season))
        .route("/resolve-count", post(handlers::resolve_season_count))
}

/// Tree position routes
fn tree_routes() -> Router<AppState> {
    Router::new().route("/relocation/validate", post(handlers::validate_tree_relocation))
}

/// Zone geometry routes
fn zone_routes() -> Router<AppState> {
    Router::new().route("/area", post(handlers::estimate_zone_area))
}
