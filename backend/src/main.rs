//! Orchard Season & Spatial Integrity Engine - Backend Server
//!
//! A stateless JSON service that lets the farm-record application classify
//! season phases, normalize legacy yield records, validate tree relocations and
//! estimate zone areas. Persistence stays with the caller.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "orchard_engine_server=debug,shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;
    config
        .engine
        .validate()
        .map_err(error::AppError::from)?;

    tracing::info!("Starting Orchard Engine Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        max_relocation_meters = config.engine.max_relocation_meters,
        cutoff_month = config.engine.harvest_calendar.cutoff_month,
        "Engine settings loaded"
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let ip: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| error::AppError::Configuration(format!("server.host: {}", e)))?;
    let addr = SocketAddr::from((ip, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Orchard Season & Spatial Integrity Engine API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
