//! Sensor store backed by SQLite

use crate::{init_schema, Sensor, StorageError, StoreConfig};
use metrics::counter;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

const SELECT_ALL: &str = "SELECT name, latitude, longitude, tags FROM sensors ORDER BY rowid";

const SELECT_BY_NAME: &str = "SELECT name, latitude, longitude, tags FROM sensors WHERE name = ?1";

const INSERT: &str = r#"
    INSERT INTO sensors (name, latitude, longitude, tags)
    VALUES (?1, ?2, ?3, ?4)
    RETURNING name, latitude, longitude, tags
"#;

const UPDATE: &str = r#"
    UPDATE sensors
    SET name = ?1, latitude = ?2, longitude = ?3, tags = ?4
    WHERE name = ?5
    RETURNING name, latitude, longitude, tags
"#;

const DELETE: &str = r#"
    DELETE FROM sensors
    WHERE name = ?1
    RETURNING name, latitude, longitude, tags
"#;

const COUNT: &str = "SELECT COUNT(*) FROM sensors";

/// Durable CRUD over the `sensors` table.
///
/// Cloning is cheap and shares the underlying pool. Every operation is a
/// single statement, so SQLite's per-statement atomicity is the only
/// consistency guarantee relied upon.
#[derive(Debug, Clone)]
pub struct SensorStore {
    pool: SqlitePool,
}

impl SensorStore {
    /// Open a pool for `config` and make sure the schema exists
    pub async fn connect(config: &StoreConfig) -> Result<Self, StorageError> {
        info!("Connecting sensor store to {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| StorageError::StoreUnavailable(e.to_string()))?;

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

        if config.is_in_memory() {
            // the database lives only as long as its single connection
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StorageError::StoreUnavailable(e.to_string()))?;

        Self::new(pool).await
    }

    /// Wrap an existing pool, creating the table if needed
    pub async fn new(pool: SqlitePool) -> Result<Self, StorageError> {
        init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Fresh private in-memory store
    pub async fn in_memory() -> Result<Self, StorageError> {
        Self::connect(&StoreConfig::in_memory()).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool; later operations fail with `StoreUnavailable`
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// All sensors, in insertion order
    pub async fn list(&self) -> Result<Vec<Sensor>, StorageError> {
        let result = self.fetch_all().await;
        record("list", &result);
        result
    }

    /// Insert a new sensor and return the row as stored
    pub async fn insert(&self, sensor: &Sensor) -> Result<Sensor, StorageError> {
        let result = self.insert_row(sensor).await;
        record("insert", &result);
        result
    }

    /// Look up a sensor by its unique name
    pub async fn get_by_name(&self, name: &str) -> Result<Sensor, StorageError> {
        let result = self.fetch_by_name(name).await;
        record("get", &result);
        result
    }

    /// Replace every field of the sensor currently called `old_name`.
    ///
    /// `sensor.name` may differ from `old_name`, which renames the row.
    pub async fn update(&self, old_name: &str, sensor: &Sensor) -> Result<Sensor, StorageError> {
        let result = self.update_row(old_name, sensor).await;
        record("update", &result);
        result
    }

    /// Remove a sensor and return what was deleted
    pub async fn delete(&self, name: &str) -> Result<Sensor, StorageError> {
        let result = self.delete_row(name).await;
        record("delete", &result);
        result
    }

    /// Number of stored sensors
    pub async fn count(&self) -> Result<u64, StorageError> {
        let result = self.count_rows().await;
        record("count", &result);
        result
    }

    async fn count_rows(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar(COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::from_sqlx(e, ""))?;

        Ok(count.max(0) as u64)
    }

    async fn fetch_all(&self) -> Result<Vec<Sensor>, StorageError> {
        let rows = sqlx::query(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::from_sqlx(e, ""))?;

        let sensors = rows.iter().map(sensor_from_row).collect::<Result<Vec<_>, _>>()?;
        debug!("Listed {} sensors", sensors.len());
        Ok(sensors)
    }

    async fn insert_row(&self, sensor: &Sensor) -> Result<Sensor, StorageError> {
        sensor.validate()?;
        let tags = encode_tags(&sensor.tags)?;

        let row = sqlx::query(INSERT)
            .bind(sensor.name.as_str())
            .bind(sensor.latitude)
            .bind(sensor.longitude)
            .bind(tags)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::from_sqlx(e, &sensor.name))?;

        let stored = sensor_from_row(&row)?;
        debug!("Inserted sensor {}", stored.name);
        Ok(stored)
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Sensor, StorageError> {
        // names are UNIQUE, so at most one row matches
        let row = sqlx::query(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::from_sqlx(e, name))?
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;

        sensor_from_row(&row)
    }

    async fn update_row(&self, old_name: &str, sensor: &Sensor) -> Result<Sensor, StorageError> {
        sensor.validate()?;
        let tags = encode_tags(&sensor.tags)?;

        let row = sqlx::query(UPDATE)
            .bind(sensor.name.as_str())
            .bind(sensor.latitude)
            .bind(sensor.longitude)
            .bind(tags)
            .bind(old_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::from_sqlx(e, &sensor.name))?
            .ok_or_else(|| StorageError::NotFound(old_name.to_string()))?;

        let stored = sensor_from_row(&row)?;
        if stored.name != old_name {
            info!("Renamed sensor {} to {}", old_name, stored.name);
        } else {
            debug!("Updated sensor {}", stored.name);
        }
        Ok(stored)
    }

    async fn delete_row(&self, name: &str) -> Result<Sensor, StorageError> {
        let row = sqlx::query(DELETE)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::from_sqlx(e, name))?
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;

        let deleted = sensor_from_row(&row)?;
        debug!("Deleted sensor {}", deleted.name);
        Ok(deleted)
    }
}

fn record<T>(op: &'static str, result: &Result<T, StorageError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => {
            warn!("Sensor store {} failed: {}", op, e);
            e.kind()
        }
    };
    counter!("sensor_store_operations_total", "op" => op, "outcome" => outcome).increment(1);
}

fn encode_tags(tags: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(tags)
        .map_err(|e| StorageError::QueryFailed(format!("could not encode tags: {}", e)))
}

fn sensor_from_row(row: &SqliteRow) -> Result<Sensor, StorageError> {
    let decode = |e: sqlx::Error| StorageError::QueryFailed(e.to_string());

    let name: String = row.try_get("name").map_err(decode)?;
    let latitude: f64 = row.try_get("latitude").map_err(decode)?;
    let longitude: f64 = row.try_get("longitude").map_err(decode)?;
    let raw_tags: String = row.try_get("tags").map_err(decode)?;

    let tags = serde_json::from_str(&raw_tags).map_err(|e| {
        StorageError::QueryFailed(format!("malformed tags for sensor {:?}: {}", name, e))
    })?;

    Ok(Sensor {
        name,
        latitude,
        longitude,
        tags,
    })
}
