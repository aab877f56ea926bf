//! Acadlake Common Library
//!
//! Shared code for the Acadlake ETL services including:
//! - Connection parameters and backend probing
//! - Warehouse models and connection pool
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod connect;
pub mod errors;
pub mod metrics;
pub mod warehouse;

// Re-export commonly used types
pub use config::AppConfig;
pub use connect::{BackendKind, ConnectionParams, ConnectionStatus, ProbeOutcome};
pub use errors::{EtlError, Result};
pub use warehouse::WarehousePool;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collection holding per-faculty research documents unless configured otherwise
pub const DEFAULT_RESEARCH_COLLECTION: &str = "faculty_research_papers";
