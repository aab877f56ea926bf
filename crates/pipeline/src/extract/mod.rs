//! Extractors
//!
//! Each backend gets its own extractor owning its connection handle:
//! [`SqlExtractor`] for the relational source of truth, [`DocumentExtractor`]
//! for the research-paper document store. Both implement [`Extractor`]
//! (connect / extract / schema) one trait level deep.

mod document;
mod sql;

pub use document::DocumentExtractor;
pub use sql::SqlExtractor;

use acadlake_common::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

/// Discovered column (relational) or field (document) description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

/// Table/collection name -> ordered column listing
pub type SchemaInfo = BTreeMap<String, Vec<ColumnInfo>>;

/// Common extractor surface over heterogeneous backends
#[async_trait]
pub trait Extractor {
    /// Tabular form this extractor produces
    type Output;

    /// Establish the backend connection and verify it with a minimal
    /// round-trip. Returns false on failure (with the cause logged) and
    /// never retains a half-open handle.
    async fn connect(&mut self) -> bool;

    /// Pull raw records into the in-memory tabular form
    async fn extract(&mut self) -> Result<Self::Output>;

    /// Discover the source schema
    async fn schema(&mut self) -> Result<SchemaInfo>;
}
