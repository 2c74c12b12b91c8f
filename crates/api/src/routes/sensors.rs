//! Sensor Routes

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use locator::{nearest, Point};
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;
use storage::Sensor;
use tracing::debug;

use crate::response::{fail, ok, store_failure};
use crate::AppState;

const LIST_FAILED: &str = "Could not retrieve list of sensors";
const INSERT_FAILED: &str = "Could not insert new sensor";
const FETCH_FAILED: &str = "Could not fetch sensor metadata";
const EMPTY_REGISTRY: &str = "List of known sensors is empty";

/// Path segment of the nearest-sensor route
const NEAREST: &str = "nearest";

/// Optional query form of the nearest-sensor point
#[derive(Debug, Default, Deserialize)]
pub struct NearestQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Decode a JSON request body. Clients are not required to send a
/// `Content-Type` header.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        fail(
            StatusCode::BAD_REQUEST,
            format!("Could not parse JSON body: {}", e),
        )
    })
}

/// `GET /sensors`
pub async fn list_sensors(State(state): State<Arc<AppState>>) -> Response {
    debug!("Running list_sensors");

    match state.store.list().await {
        Ok(sensors) => ok(StatusCode::OK, sensors),
        Err(e) => store_failure(LIST_FAILED, &e),
    }
}

/// `POST /sensors`
pub async fn insert_sensor(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    debug!("Running insert_sensor");

    let sensor: Sensor = match parse_body(&body) {
        Ok(sensor) => sensor,
        Err(resp) => return resp,
    };

    match state.store.insert(&sensor).await {
        Ok(stored) => ok(StatusCode::CREATED, stored),
        Err(e) => store_failure(INSERT_FAILED, &e),
    }
}

/// `GET /sensors/:name`
pub async fn get_sensor(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    debug!("Running get_sensor for {}", name);

    match state.store.get_by_name(&name).await {
        Ok(sensor) => ok(StatusCode::OK, sensor),
        Err(e) => store_failure(FETCH_FAILED, &e),
    }
}

/// `PUT /sensors/:name`
pub async fn update_sensor(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    update_by_name(&state, &name, &body).await
}

/// `DELETE /sensors/:name`
pub async fn delete_sensor(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    delete_by_name(&state, &name).await
}

/// `PUT /sensors/nearest`, which the static route takes from `:name`
pub async fn update_sensor_named_nearest(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Response {
    update_by_name(&state, NEAREST, &body).await
}

/// `DELETE /sensors/nearest`, which the static route takes from `:name`
pub async fn delete_sensor_named_nearest(State(state): State<Arc<AppState>>) -> Response {
    delete_by_name(&state, NEAREST).await
}

async fn update_by_name(state: &AppState, name: &str, body: &Bytes) -> Response {
    debug!("Running update_sensor for {}", name);

    let sensor: Sensor = match parse_body(body) {
        Ok(sensor) => sensor,
        Err(resp) => return resp,
    };

    match state.store.update(name, &sensor).await {
        Ok(stored) => ok(StatusCode::OK, stored),
        Err(e) => store_failure(FETCH_FAILED, &e),
    }
}

async fn delete_by_name(state: &AppState, name: &str) -> Response {
    debug!("Running delete_sensor for {}", name);

    match state.store.delete(name).await {
        Ok(deleted) => ok(StatusCode::OK, deleted),
        Err(e) => store_failure(FETCH_FAILED, &e),
    }
}

/// `GET /sensors/nearest`
///
/// The point comes from `?latitude=&longitude=` when both are given,
/// otherwise from a JSON body.
pub async fn nearest_sensor(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearestQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    debug!("Running nearest_sensor");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return fail(
                StatusCode::BAD_REQUEST,
                format!("Could not parse query: {}", rejection.body_text()),
            )
        }
    };

    let point = match (query.latitude, query.longitude) {
        (Some(latitude), Some(longitude)) => Point::new(latitude, longitude),
        _ => match parse_body::<Point>(&body) {
            Ok(point) => point,
            Err(resp) => return resp,
        },
    };

    if !point.latitude.is_finite() || !point.longitude.is_finite() {
        return fail(
            StatusCode::BAD_REQUEST,
            "Could not parse query: latitude and longitude must be finite numbers".to_string(),
        );
    }

    let sensors = match state.store.list().await {
        Ok(sensors) => sensors,
        Err(e) => return store_failure(LIST_FAILED, &e),
    };

    match nearest(&point, &sensors) {
        Some(sensor) => ok(StatusCode::OK, sensor),
        None => fail(StatusCode::NOT_FOUND, EMPTY_REGISTRY.to_string()),
    }
}
