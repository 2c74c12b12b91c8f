//! Store configuration

use serde::{Deserialize, Serialize};

/// Connection settings for the sensor store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// sqlx connection URL, e.g. `sqlite://sensors.db?mode=rwc`
    pub database_url: String,
    /// Pool size
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before giving up
    pub acquire_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://sensors.db?mode=rwc".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

impl StoreConfig {
    /// Private in-memory database, mostly for tests
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            // the in-memory database is dropped with its last connection
            max_connections: 1,
            ..Self::default()
        }
    }

    pub(crate) fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}
