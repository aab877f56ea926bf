//! Configuration management for Acadlake services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use crate::connect::{BackendKind, ConnectionParams};
use crate::DEFAULT_RESEARCH_COLLECTION;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Relational source of truth (faculty/department/school tables)
    pub faculty_source: ConnectionParams,

    /// Document store holding per-faculty research-paper documents
    pub research_source: ResearchSourceConfig,

    /// Analytics warehouse the loader writes to
    pub warehouse: WarehouseConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResearchSourceConfig {
    pub connection: ConnectionParams,

    /// Collection holding the faculty research documents
    #[serde(default = "default_research_collection")]
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WarehouseConfig {
    pub connection: ConnectionParams,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of pooled connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl WarehouseConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            service_name: default_service_name(),
        }
    }
}

// Default value functions
fn default_research_collection() -> String {
    DEFAULT_RESEARCH_COLLECTION.to_string()
}
fn default_max_connections() -> u32 {
    50
}
fn default_min_connections() -> u32 {
    5
}
fn default_idle_timeout() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_json_logging() -> bool {
    true
}
fn default_service_name() -> String {
    "acadlake".to_string()
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__WAREHOUSE__CONNECTION__HOST=analytics.internal
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut faculty_source = ConnectionParams::new(BackendKind::Mysql);
        faculty_source.database = Some("university".to_string());

        let mut research_connection = ConnectionParams::new(BackendKind::Mongodb);
        research_connection.database = Some("faculty_records".to_string());

        let mut warehouse_connection = ConnectionParams::new(BackendKind::Postgresql);
        warehouse_connection.database = Some("etl_data".to_string());

        Self {
            faculty_source,
            research_source: ResearchSourceConfig {
                connection: research_connection,
                collection: default_research_collection(),
            },
            warehouse: WarehouseConfig {
                connection: warehouse_connection,
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                idle_timeout_secs: default_idle_timeout(),
            },
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.faculty_source.db_type, BackendKind::Mysql);
        assert_eq!(config.research_source.connection.db_type, BackendKind::Mongodb);
        assert_eq!(config.warehouse.connection.db_type, BackendKind::Postgresql);
        assert_eq!(config.research_source.collection, "faculty_research_papers");
    }

    #[test]
    fn test_warehouse_pool_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.warehouse.max_connections, 50);
        assert_eq!(config.warehouse.min_connections, 5);
        assert_eq!(config.warehouse.idle_timeout(), Duration::from_secs(300));
    }
}
