//! JSON response envelope
//!
//! Every sensor endpoint answers with
//! `{"success": bool, "sensor": <payload or null>, "error_msg": string}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use storage::StorageError;
use tracing::error;

/// Envelope wrapping a sensor payload
#[derive(Debug, Serialize)]
pub struct SensorEnvelope<T> {
    pub success: bool,
    pub sensor: Option<T>,
    pub error_msg: String,
}

/// Build the envelope response. Failures are logged here.
pub fn respond<T: Serialize>(
    status: StatusCode,
    success: bool,
    payload: Option<T>,
    error_msg: String,
) -> Response {
    if !error_msg.is_empty() {
        error!("{}", error_msg);
    }

    let envelope = SensorEnvelope {
        success,
        sensor: payload,
        error_msg,
    };
    (status, Json(envelope)).into_response()
}

/// Successful response carrying `payload`
pub fn ok<T: Serialize>(status: StatusCode, payload: T) -> Response {
    respond(status, true, Some(payload), String::new())
}

/// Failed response with no payload
pub fn fail(status: StatusCode, error_msg: String) -> Response {
    respond::<()>(status, false, None, error_msg)
}

/// Failed response for a store error, prefixed with what was being attempted
pub fn store_failure(context: &str, err: &StorageError) -> Response {
    fail(status_for(err), format!("{}: {}", context, err))
}

/// HTTP status for a store error
pub fn status_for(err: &StorageError) -> StatusCode {
    match err {
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::DuplicateName(_) => StatusCode::CONFLICT,
        StorageError::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
        StorageError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StorageError::QueryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
