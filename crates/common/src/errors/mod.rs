//! Error types for Acadlake services
//!
//! One error enum covers the whole pipeline surface:
//! - Connectivity failures at the probe/connect boundary
//! - Structural errors in extracted rows and documents
//! - Warehouse load failures
//! - Configuration problems

use crate::connect::BackendKind;
use thiserror::Error;

/// Result type alias using EtlError
pub type Result<T> = std::result::Result<T, EtlError>;

/// Application error types
#[derive(Error, Debug)]
pub enum EtlError {
    // Connectivity errors
    #[error("Connection to {backend} failed: {message}")]
    Connection {
        backend: BackendKind,
        message: String,
    },

    // Structural/schema errors
    #[error("Extraction of {entity} failed: {message}")]
    Extraction { entity: String, message: String },

    #[error("Malformed document (faculty_id {faculty_id}): {message}")]
    MalformedDocument {
        faculty_id: String,
        message: String,
    },

    #[error("Unexpected row shape in {table}: {message}")]
    RowShape { table: String, message: String },

    // Load errors
    #[error("Warehouse load failed at {step}: {message}")]
    Load { step: String, message: String },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Document store error: {0}")]
    DocumentStore(#[from] mongodb::error::Error),

    // Internal errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl EtlError {
    /// Connectivity errors are handled at the probe/connect boundary and
    /// must never surface as raw driver errors past the extractors.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, EtlError::Connection { .. })
    }

    /// Structural errors halt the run; quality anomalies do not reach here.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EtlError::Extraction { .. }
                | EtlError::MalformedDocument { .. }
                | EtlError::RowShape { .. }
        )
    }
}

impl From<::config::ConfigError> for EtlError {
    fn from(err: ::config::ConfigError) -> Self {
        EtlError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        let err = EtlError::Connection {
            backend: BackendKind::Mysql,
            message: "access denied".into(),
        };
        assert!(err.is_connectivity());
        assert!(!err.is_structural());
    }

    #[test]
    fn test_structural_classification() {
        let err = EtlError::MalformedDocument {
            faculty_id: "42".into(),
            message: "missing papers key".into(),
        };
        assert!(err.is_structural());
        assert!(!err.is_connectivity());
    }

    #[test]
    fn test_display_includes_backend() {
        let err = EtlError::Connection {
            backend: BackendKind::Mongodb,
            message: "server selection timed out".into(),
        };
        assert!(err.to_string().contains("mongodb"));
    }
}
