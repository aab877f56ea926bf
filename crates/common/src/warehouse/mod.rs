//! Warehouse layer for Acadlake
//!
//! Provides:
//! - SeaORM entity models for the analytical store
//! - Connection pool management with explicit lifecycle

pub mod models;

use crate::config::WarehouseConfig;
use crate::connect::BackendKind;
use crate::errors::{EtlError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Warehouse connection pool wrapper
///
/// Created at orchestrator start and disposed at end; never a process-wide
/// singleton.
#[derive(Clone)]
pub struct WarehousePool {
    conn: DatabaseConnection,
}

impl WarehousePool {
    /// Create a new warehouse pool from configuration
    pub async fn new(config: &WarehouseConfig) -> Result<Self> {
        if config.connection.db_type != BackendKind::Postgresql {
            return Err(EtlError::Configuration {
                message: format!(
                    "the analytics warehouse must be postgresql, got '{}'",
                    config.connection.db_type
                ),
            });
        }

        info!("Connecting to warehouse...");

        let mut options = ConnectOptions::new(config.connection.url()?);
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connection.connect_timeout())
            .idle_timeout(config.idle_timeout())
            .sqlx_logging(true);

        let conn = Database::connect(options)
            .await
            .map_err(|e| EtlError::Connection {
                backend: BackendKind::Postgresql,
                message: format!("Failed to connect to warehouse: {}", e),
            })?;

        info!("Warehouse connection established");

        Ok(Self { conn })
    }

    /// Get the underlying connection
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Ping the warehouse to check connectivity
    pub async fn ping(&self) -> Result<()> {
        use sea_orm::ConnectionTrait;

        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| EtlError::Connection {
                backend: BackendKind::Postgresql,
                message: format!("Warehouse ping failed: {}", e),
            })?;

        Ok(())
    }

    /// Close the pool, releasing every connection
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}
