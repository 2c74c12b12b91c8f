//! Schema management for the `sensors` table.

use crate::StorageError;
use sqlx::SqlitePool;
use tracing::debug;

const CREATE_SENSORS: &str = r#"
    CREATE TABLE IF NOT EXISTS sensors (
        name      TEXT NOT NULL UNIQUE CHECK (length(name) > 0),
        latitude  REAL NOT NULL,
        longitude REAL NOT NULL,
        tags      TEXT NOT NULL
    )
"#;

/// Create the `sensors` table if it does not exist yet.
///
/// Idempotent; runs on every start. `tags` holds a JSON array of strings.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query(CREATE_SENSORS)
        .execute(pool)
        .await
        .map_err(|e| StorageError::from_sqlx(e, ""))?;

    debug!("sensors table ready");
    Ok(())
}
