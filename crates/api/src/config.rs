//! Server configuration
//!
//! Loaded from an optional `sensor-api.{toml,yaml,json}` file, then
//! overridden by `SENSOR_API_*` environment variables. Nested keys use a
//! double underscore, e.g. `SENSOR_API_STORE__DATABASE_URL`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use storage::StoreConfig;

/// Default config file stem, looked up in the working directory
pub const CONFIG_FILE: &str = "sensor-api";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Listen address
    pub bind_addr: String,
    /// Max tracing level (`trace`, `debug`, `info`, `warn`, `error`)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Send permissive CORS headers
    pub allow_any_origin: bool,
    /// Sensor database settings
    pub store: StoreConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            log_level: "debug".to_string(),
            log_format: LogFormat::Pretty,
            allow_any_origin: false,
            store: StoreConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load from `sensor-api.*` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from the given config file stem and the environment
    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        Self::build(
            Config::builder()
                .add_source(File::with_name(file_stem).required(false))
                .add_source(
                    Environment::with_prefix("SENSOR_API")
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
