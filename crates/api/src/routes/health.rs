//! Health and metrics routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

/// Database health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub sensor_count: Option<u64>,
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let (status, database) = match state.store.count().await {
        Ok(count) => (
            StatusCode::OK,
            ComponentHealth {
                status: "ok".to_string(),
                sensor_count: Some(count),
            },
        ),
        Err(e) => {
            warn!("Health check could not reach the store: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ComponentHealth {
                    status: e.kind().to_string(),
                    sensor_count: None,
                },
            )
        }
    };

    let response = HealthResponse {
        status: if status.is_success() { "healthy" } else { "degraded" }.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
    };

    (status, Json(response)).into_response()
}

/// `GET /metrics` in Prometheus text format
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
