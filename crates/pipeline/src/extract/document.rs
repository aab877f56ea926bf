//! Document store extractor
//!
//! Reads per-faculty research documents and flattens them into one row per
//! paper. Parsing is defensive: the shape of each document is checked field
//! by field, and structural breakage (a missing or non-list `papers` value)
//! is fatal for the batch because the loader depends on structural
//! completeness.

use crate::extract::{ColumnInfo, Extractor, SchemaInfo};
use crate::tables::{split_full_name, AreaValue, PaperRow};
use acadlake_common::connect::{BackendKind, ConnectionParams};
use acadlake_common::errors::{EtlError, Result};
use acadlake_common::metrics;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Database};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// How many documents to sample per collection for schema inference
const SCHEMA_SAMPLE_SIZE: i64 = 10;

/// Extractor over the research-paper document store
pub struct DocumentExtractor {
    params: ConnectionParams,
    collection: String,
    client: Option<Client>,
}

impl DocumentExtractor {
    pub fn new(params: ConnectionParams, collection: impl Into<String>) -> Self {
        Self {
            params,
            collection: collection.into(),
            client: None,
        }
    }

    fn database(&self) -> Result<Database> {
        let client = self.client.as_ref().ok_or_else(|| EtlError::Connection {
            backend: BackendKind::Mongodb,
            message: "document store is not connected".to_string(),
        })?;
        let name = self
            .params
            .database
            .as_deref()
            .ok_or_else(|| EtlError::Configuration {
                message: "document source requires a database name".to_string(),
            })?;
        Ok(client.database(name))
    }

    async fn ensure_connected(&mut self) -> Result<()> {
        if self.client.is_none() && !self.connect().await {
            return Err(EtlError::Connection {
                backend: BackendKind::Mongodb,
                message: "document store connection could not be established".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Extractor for DocumentExtractor {
    type Output = Vec<PaperRow>;

    async fn connect(&mut self) -> bool {
        let url = match self.params.url() {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "could not build document store URL");
                return false;
            }
        };

        let mut options = match ClientOptions::parse(url).await {
            Ok(options) => options,
            Err(err) => {
                warn!(error = %err, "invalid document store connection string");
                return false;
            }
        };
        options.server_selection_timeout = Some(self.params.connect_timeout());
        options.connect_timeout = Some(self.params.connect_timeout());

        let client = match Client::with_options(options) {
            Ok(client) => client,
            Err(err) => {
                warn!(error = %err, "failed to build document store client");
                return false;
            }
        };

        match client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
        {
            Ok(_) => {
                info!("document store connected");
                self.client = Some(client);
                true
            }
            Err(err) => {
                warn!(error = %err, "document store ping failed");
                false
            }
        }
    }

    /// Flatten every research document into one row per paper.
    ///
    /// An empty collection is a success with an empty table, not an error.
    #[instrument(skip(self), fields(collection = %self.collection))]
    async fn extract(&mut self) -> Result<Self::Output> {
        self.ensure_connected().await?;
        let collection = self.database()?.collection::<Document>(&self.collection);

        let read_failed = |e: mongodb::error::Error| EtlError::Extraction {
            entity: "research_papers".to_string(),
            message: e.to_string(),
        };

        let mut rows = Vec::new();
        let mut documents = 0usize;
        let mut cursor = collection.find(doc! {}, None).await.map_err(read_failed)?;
        while let Some(document) = cursor.try_next().await.map_err(read_failed)? {
            rows.extend(flatten_document(&document)?);
            documents += 1;
        }

        info!(documents, papers = rows.len(), "document extraction complete");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn schema(&mut self) -> Result<SchemaInfo> {
        self.ensure_connected().await?;
        let db = self.database()?;

        let mut schema = SchemaInfo::new();
        for name in db.list_collection_names(None).await? {
            let collection = db.collection::<Document>(&name);
            let options = FindOptions::builder().limit(SCHEMA_SAMPLE_SIZE).build();

            let mut fields: BTreeMap<String, String> = BTreeMap::new();
            let mut cursor = collection.find(doc! {}, options).await?;
            while let Some(document) = cursor.try_next().await? {
                for (key, value) in document.iter() {
                    if key == "_id" {
                        continue;
                    }
                    let observed = bson_type_name(value).to_string();
                    fields
                        .entry(key.clone())
                        .and_modify(|known| {
                            if *known != observed {
                                *known = "mixed".to_string();
                            }
                        })
                        .or_insert(observed);
                }
            }

            schema.insert(
                name,
                fields
                    .into_iter()
                    .map(|(name, data_type)| ColumnInfo { name, data_type })
                    .collect(),
            );
        }
        Ok(schema)
    }
}

/// Flatten one faculty research document into paper rows.
///
/// Fatal: missing/non-integer faculty_id, missing or non-list `papers`,
/// papers without a title or year. Quality anomalies (a name that resolves
/// to fewer than two parts) are logged and counted, never dropped.
pub fn flatten_document(document: &Document) -> Result<Vec<PaperRow>> {
    let faculty_id = int_field(document, "faculty_id").ok_or_else(|| malformed(
        document,
        "faculty_id is missing or not an integer",
    ))?;

    let name = split_full_name(opt_string(document, "faculty_name").as_deref().unwrap_or(""));
    if name.is_partial() {
        warn!(faculty_id, "faculty_name resolved to fewer than two parts");
        metrics::record_anomaly("partial_faculty_name");
    }

    let school = opt_string(document, "school");
    // "NULL" is a sentinel the source uses for schools without departments
    let department = opt_string(document, "department")
        .filter(|value| value != "NULL")
        .or_else(|| school.clone());

    let research_area = area_field(document);

    let papers = match document.get("papers") {
        Some(Bson::Array(items)) => items,
        Some(_) => return Err(malformed(document, "papers is not a list")),
        None => return Err(malformed(document, "missing papers key")),
    };

    let mut rows = Vec::with_capacity(papers.len());
    for paper in papers {
        let paper = match paper {
            Bson::Document(inner) => inner,
            _ => return Err(malformed(document, "papers contains a non-document entry")),
        };

        let paper_title = opt_string(paper, "title")
            .ok_or_else(|| malformed(document, "paper is missing a title"))?;
        let published_year = int_field(paper, "year")
            .ok_or_else(|| malformed(document, "paper is missing a year"))?;

        rows.push(PaperRow {
            faculty_id,
            first_name: name.first.clone(),
            middle_name: name.middle.clone(),
            last_name: name.last.clone(),
            department: department.clone(),
            school: school.clone(),
            research_area: research_area.clone(),
            paper_title,
            published_year,
            journal: opt_string(paper, "journal"),
            coauthors: coauthors_field(paper),
        });
    }
    Ok(rows)
}

fn malformed(document: &Document, message: &str) -> EtlError {
    let faculty_id = document
        .get("faculty_id")
        .map(Bson::to_string)
        .unwrap_or_else(|| "<missing>".to_string());
    EtlError::MalformedDocument {
        faculty_id,
        message: message.to_string(),
    }
}

fn opt_string(document: &Document, key: &str) -> Option<String> {
    match document.get(key) {
        Some(Bson::String(value)) => Some(value.clone()),
        _ => None,
    }
}

fn int_field(document: &Document, key: &str) -> Option<i32> {
    match document.get(key) {
        Some(Bson::Int32(value)) => Some(*value),
        Some(Bson::Int64(value)) => i32::try_from(*value).ok(),
        _ => None,
    }
}

fn area_field(document: &Document) -> AreaValue {
    match document.get("research_area") {
        Some(Bson::String(value)) => AreaValue::Scalar(value.clone()),
        Some(Bson::Array(items)) => {
            let values: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Bson::String(value) => Some(value.clone()),
                    _ => None,
                })
                .collect();
            if values.len() != items.len() {
                warn!("research_area list contains non-string entries");
                metrics::record_anomaly("non_string_research_area");
            }
            AreaValue::List(values)
        }
        _ => AreaValue::empty(),
    }
}

/// Co-authors arrive as a list of names (occasionally a plain string);
/// serialize to free text for the warehouse.
fn coauthors_field(paper: &Document) -> Option<String> {
    match paper.get("co_authors") {
        Some(Bson::Array(items)) => {
            let names: Vec<&str> = items
                .iter()
                .filter_map(|item| match item {
                    Bson::String(value) => Some(value.as_str()),
                    _ => None,
                })
                .collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        Some(Bson::String(value)) => Some(value.clone()),
        _ => None,
    }
}

fn bson_type_name(value: &Bson) -> &'static str {
    match value {
        Bson::String(_) => "string",
        Bson::Int32(_) => "int32",
        Bson::Int64(_) => "int64",
        Bson::Double(_) => "double",
        Bson::Boolean(_) => "bool",
        Bson::Array(_) => "array",
        Bson::Document(_) => "document",
        Bson::DateTime(_) => "datetime",
        Bson::Null => "null",
        Bson::ObjectId(_) => "objectId",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_three_token_name() {
        let document = doc! {
            "faculty_id": 7,
            "faculty_name": "John Q Public",
            "papers": [
                { "title": "T1", "year": 2020, "journal": "J1", "co_authors": ["X"] },
            ],
        };

        let rows = flatten_document(&document).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].faculty_id, 7);
        assert_eq!(rows[0].first_name.as_deref(), Some("John"));
        assert_eq!(rows[0].middle_name.as_deref(), Some("Q"));
        assert_eq!(rows[0].last_name.as_deref(), Some("Public"));
        assert_eq!(rows[0].paper_title, "T1");
        assert_eq!(rows[0].published_year, 2020);
        assert_eq!(rows[0].journal.as_deref(), Some("J1"));
        assert_eq!(rows[0].coauthors.as_deref(), Some("X"));
    }

    #[test]
    fn test_department_null_sentinel_falls_back_to_school() {
        let document = doc! {
            "faculty_id": 11,
            "faculty_name": "Jane Doe",
            "department": "NULL",
            "school": "School of Law",
            "papers": [ { "title": "T", "year": 2021 } ],
        };

        let rows = flatten_document(&document).unwrap();
        assert_eq!(rows[0].department.as_deref(), Some("School of Law"));
        assert_eq!(rows[0].school.as_deref(), Some("School of Law"));
    }

    #[test]
    fn test_missing_department_falls_back_to_school() {
        let document = doc! {
            "faculty_id": 12,
            "faculty_name": "Jane Doe",
            "school": "School of Management",
            "papers": [ { "title": "T", "year": 2021 } ],
        };

        let rows = flatten_document(&document).unwrap();
        assert_eq!(rows[0].department.as_deref(), Some("School of Management"));
    }

    #[test]
    fn test_missing_papers_is_fatal() {
        let document = doc! { "faculty_id": 3, "faculty_name": "Jane Doe" };
        let err = flatten_document(&document).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_non_list_papers_is_fatal() {
        let document = doc! {
            "faculty_id": 3,
            "faculty_name": "Jane Doe",
            "papers": "not a list",
        };
        assert!(flatten_document(&document).is_err());
    }

    #[test]
    fn test_paper_without_year_is_fatal() {
        let document = doc! {
            "faculty_id": 3,
            "faculty_name": "Jane Doe",
            "papers": [ { "title": "T" } ],
        };
        assert!(flatten_document(&document).is_err());
    }

    #[test]
    fn test_area_string_and_list_both_accepted() {
        let scalar = doc! {
            "faculty_id": 1,
            "faculty_name": "A B",
            "research_area": "Machine Learning, NLP",
            "papers": [ { "title": "T", "year": 2019 } ],
        };
        let rows = flatten_document(&scalar).unwrap();
        assert_eq!(
            rows[0].research_area,
            AreaValue::Scalar("Machine Learning, NLP".into())
        );

        let list = doc! {
            "faculty_id": 2,
            "faculty_name": "A B",
            "research_area": ["Machine Learning", "NLP"],
            "papers": [ { "title": "T", "year": 2019 } ],
        };
        let rows = flatten_document(&list).unwrap();
        assert_eq!(
            rows[0].research_area,
            AreaValue::List(vec!["Machine Learning".into(), "NLP".into()])
        );
    }

    #[test]
    fn test_single_token_name_kept_with_nulls() {
        let document = doc! {
            "faculty_id": 9,
            "faculty_name": "Cher",
            "papers": [ { "title": "T", "year": 2018 } ],
        };

        let rows = flatten_document(&document).unwrap();
        assert_eq!(rows[0].first_name.as_deref(), Some("Cher"));
        assert_eq!(rows[0].middle_name, None);
        assert_eq!(rows[0].last_name, None);
    }

    #[test]
    fn test_coauthors_join() {
        let paper = doc! { "co_authors": ["X", "Y"] };
        assert_eq!(coauthors_field(&paper).as_deref(), Some("X, Y"));

        let empty = doc! { "co_authors": [] };
        assert_eq!(coauthors_field(&empty), None);
    }
}
