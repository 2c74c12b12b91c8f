//! Sensor Registry API Server
//!
//! REST API for registering sensors and finding the one nearest a point.

use axum::{
    routing::get,
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod response;
mod routes;

pub use crate::config::{ApiConfig, LogFormat};
pub use crate::error::ServerError;

use storage::SensorStore;

/// Application state shared across handlers
pub struct AppState {
    /// Sensor store; the pool inside is safe to share between requests
    pub store: SensorStore,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: SensorStore, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/metrics", get(routes::health::metrics))
        .route(
            "/sensors",
            get(routes::sensors::list_sensors).post(routes::sensors::insert_sensor),
        )
        .route(
            "/sensors/nearest",
            get(routes::sensors::nearest_sensor)
                .put(routes::sensors::update_sensor_named_nearest)
                .delete(routes::sensors::delete_sensor_named_nearest),
        )
        .route(
            "/sensors/:name",
            get(routes::sensors::get_sensor)
                .put(routes::sensors::update_sensor)
                .delete(routes::sensors::delete_sensor),
        )
        .with_state(state)
}

/// Initialize logging
pub fn init_logging(config: &ApiConfig) -> Result<(), ServerError> {
    let level = Level::from_str(&config.log_level).map_err(|e| ServerError::InvalidSetting {
        key: "log_level",
        reason: e.to_string(),
    })?;

    let result = match config.log_format {
        LogFormat::Pretty => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = FmtSubscriber::builder()
                .json()
                .with_max_level(level)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    result.map_err(|e| ServerError::Logging(e.to_string()))
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))
}

/// Run the server until Ctrl-C
pub async fn run_server(config: &ApiConfig) -> Result<(), ServerError> {
    let store = SensorStore::connect(&config.store).await?;
    let metrics = init_metrics()?;

    let state = Arc::new(AppState::new(store, Some(metrics)));
    let mut app = create_router(state.clone())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    if config.allow_any_origin {
        app = app.layer(CorsLayer::permissive());
    }

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing sensor store");
    state.store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for shutdown signal: {}", e);
    }
}
