//! Storage Layer
//!
//! SQLite persistence for sensor metadata. Owns the `sensors` table and
//! every read or write against it.

mod config;
mod repository;
mod schema;
mod sensor;

pub use config::StoreConfig;
pub use repository::SensorStore;
pub use schema::init_schema;
pub use sensor::Sensor;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend unreachable (connect failure, pool closed or timed out)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    /// Another sensor already uses this name
    #[error("A sensor named {0:?} already exists")]
    DuplicateName(String),
    /// No sensor with this name
    #[error("No sensor named {0:?}")]
    NotFound(String),
    /// A required field is missing or malformed
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    /// Any other backend failure
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl StorageError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::StoreUnavailable(_) => "store_unavailable",
            StorageError::DuplicateName(_) => "duplicate_name",
            StorageError::NotFound(_) => "not_found",
            StorageError::ConstraintViolation(_) => "constraint_violation",
            StorageError::QueryFailed(_) => "query_failed",
        }
    }

    /// Classify a sqlx error. `name` is the sensor name the statement was
    /// keyed on, reported back for duplicate and missing rows.
    pub(crate) fn from_sqlx(err: sqlx::Error, name: &str) -> Self {
        use sqlx::error::ErrorKind;

        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound(name.to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => StorageError::DuplicateName(name.to_string()),
                ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                    StorageError::ConstraintViolation(db_err.message().to_string())
                }
                _ => StorageError::QueryFailed(db_err.message().to_string()),
            },
            down @ (sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)) => StorageError::StoreUnavailable(down.to_string()),
            other => StorageError::QueryFailed(other.to_string()),
        }
    }
}
