//! Relational source extractor
//!
//! Reads the faculty, department, and school tables into their tabular
//! forms. Tables stay separate, joined only by foreign-key identity; the
//! loader never needs an eager join.

use crate::extract::{ColumnInfo, Extractor, SchemaInfo};
use crate::tables::{DepartmentRow, FacultyRow, SchoolRow};
use acadlake_common::connect::ConnectionParams;
use acadlake_common::errors::{EtlError, Result};
use acadlake_common::metrics;
use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
};
use tracing::{info, instrument, warn};

/// Extractor over the relational source of truth (MySQL or PostgreSQL)
pub struct SqlExtractor {
    params: ConnectionParams,
    conn: Option<DatabaseConnection>,
}

impl SqlExtractor {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params, conn: None }
    }

    fn conn(&self) -> Result<&DatabaseConnection> {
        self.conn.as_ref().ok_or_else(|| EtlError::Connection {
            backend: self.params.db_type,
            message: "relational source is not connected".to_string(),
        })
    }

    async fn ensure_connected(&mut self) -> Result<()> {
        if self.conn.is_none() && !self.connect().await {
            return Err(EtlError::Connection {
                backend: self.params.db_type,
                message: "relational source connection could not be established".to_string(),
            });
        }
        Ok(())
    }

    async fn fetch_faculty(&self) -> Result<Vec<FacultyRow>> {
        let conn = self.conn()?;
        let stmt = Statement::from_string(
            conn.get_database_backend(),
            "SELECT faculty_id, first_name, middle_name, last_name, department, school, position \
             FROM faculties",
        );

        let shape = |e: DbErr| EtlError::RowShape {
            table: "faculties".to_string(),
            message: e.to_string(),
        };

        let mut rows = Vec::new();
        for row in conn.query_all(stmt).await? {
            let school_name: String = row.try_get("", "school").map_err(shape)?;
            let department: Option<String> = row.try_get("", "department").map_err(shape)?;

            rows.push(FacultyRow {
                faculty_id: row.try_get("", "faculty_id").map_err(shape)?,
                first_name: row.try_get("", "first_name").map_err(shape)?,
                middle_name: row.try_get("", "middle_name").map_err(shape)?,
                last_name: row.try_get("", "last_name").map_err(shape)?,
                normalized_name: String::new(),
                department_name: department_with_fallback(department, &school_name),
                school_name,
                position: row.try_get("", "position").map_err(shape)?,
            });
        }
        Ok(rows)
    }

    async fn fetch_departments(&self) -> Result<Vec<DepartmentRow>> {
        let conn = self.conn()?;
        let stmt = Statement::from_string(
            conn.get_database_backend(),
            "SELECT department_name, school, number_of_faculty FROM departments",
        );

        let shape = |e: DbErr| EtlError::RowShape {
            table: "departments".to_string(),
            message: e.to_string(),
        };

        let mut rows = Vec::new();
        for row in conn.query_all(stmt).await? {
            rows.push(DepartmentRow {
                department_name: row.try_get("", "department_name").map_err(shape)?,
                school_name: row.try_get("", "school").map_err(shape)?,
                number_of_faculty: row.try_get("", "number_of_faculty").map_err(shape)?,
            });
        }
        Ok(rows)
    }

    async fn fetch_schools(&self) -> Result<Vec<SchoolRow>> {
        let conn = self.conn()?;
        let stmt = Statement::from_string(
            conn.get_database_backend(),
            "SELECT school_name FROM schools",
        );

        let shape = |e: DbErr| EtlError::RowShape {
            table: "schools".to_string(),
            message: e.to_string(),
        };

        let mut rows = Vec::new();
        for row in conn.query_all(stmt).await? {
            rows.push(SchoolRow {
                school_name: row.try_get("", "school_name").map_err(shape)?,
            });
        }
        Ok(rows)
    }
}

#[async_trait]
impl Extractor for SqlExtractor {
    type Output = (Vec<FacultyRow>, Vec<DepartmentRow>, Vec<SchoolRow>);

    async fn connect(&mut self) -> bool {
        if !self.params.db_type.is_relational() {
            warn!(
                backend = %self.params.db_type,
                "SqlExtractor requires a relational backend kind"
            );
            return false;
        }

        let url = match self.params.url() {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "could not build relational source URL");
                return false;
            }
        };

        let mut options = ConnectOptions::new(url);
        options
            .max_connections(4)
            .connect_timeout(self.params.connect_timeout())
            .sqlx_logging(false);

        match Database::connect(options).await {
            Ok(conn) => match conn.execute_unprepared("SELECT 1").await {
                Ok(_) => {
                    info!(backend = %self.params.db_type, "relational source connected");
                    self.conn = Some(conn);
                    true
                }
                Err(err) => {
                    warn!(error = %err, "relational source liveness query failed");
                    let _ = conn.close().await;
                    false
                }
            },
            Err(err) => {
                warn!(error = %err, "failed to connect to relational source");
                false
            }
        }
    }

    /// Extract the three source tables.
    ///
    /// A failed faculties read aborts the extraction: everything downstream
    /// hangs off that table, and a full refresh from an empty one would wipe
    /// the warehouse. Department and school read failures are caught
    /// independently and yield an empty table (log-and-continue).
    /// Connection-level failures abort immediately.
    #[instrument(skip(self))]
    async fn extract(&mut self) -> Result<Self::Output> {
        self.ensure_connected().await?;

        let faculty = self.fetch_faculty().await?;
        let departments = entity_or_empty("departments", self.fetch_departments().await)?;
        let schools = entity_or_empty("schools", self.fetch_schools().await)?;

        info!(
            faculty = faculty.len(),
            departments = departments.len(),
            schools = schools.len(),
            "relational extraction complete"
        );

        Ok((faculty, departments, schools))
    }

    #[instrument(skip(self))]
    async fn schema(&mut self) -> Result<SchemaInfo> {
        self.ensure_connected().await?;
        let conn = self.conn()?;
        let backend = conn.get_database_backend();

        // information_schema is shared across both dialects; only the schema
        // filter differs.
        let sql = match backend {
            DbBackend::MySql => {
                "SELECT table_name, column_name, data_type \
                 FROM information_schema.columns \
                 WHERE table_schema = DATABASE() \
                 ORDER BY table_name, ordinal_position"
            }
            _ => {
                "SELECT table_name, column_name, data_type \
                 FROM information_schema.columns \
                 WHERE table_schema = 'public' \
                 ORDER BY table_name, ordinal_position"
            }
        };

        let shape = |e: DbErr| EtlError::RowShape {
            table: "information_schema.columns".to_string(),
            message: e.to_string(),
        };

        let mut schema = SchemaInfo::new();
        for row in conn.query_all(Statement::from_string(backend, sql)).await? {
            let table: String = row.try_get("", "table_name").map_err(shape)?;
            schema.entry(table).or_default().push(ColumnInfo {
                name: row.try_get("", "column_name").map_err(shape)?,
                data_type: row.try_get("", "data_type").map_err(shape)?,
            });
        }
        Ok(schema)
    }
}

/// Schools without departments (management, arts, law) report the school as
/// their department.
fn department_with_fallback(department: Option<String>, school: &str) -> Option<String> {
    match department {
        Some(name) if !name.trim().is_empty() => Some(name),
        _ => Some(school.to_string()),
    }
}

fn entity_or_empty<T>(entity: &str, result: Result<Vec<T>>) -> Result<Vec<T>> {
    match result {
        Ok(rows) => Ok(rows),
        Err(err) if is_connection_error(&err) => Err(err),
        Err(err) => {
            warn!(entity, error = %err, "extraction failed; continuing with an empty table");
            metrics::record_anomaly("entity_extraction_failed");
            Ok(Vec::new())
        }
    }
}

fn is_connection_error(err: &EtlError) -> bool {
    match err {
        EtlError::Database(DbErr::Conn(_)) | EtlError::Database(DbErr::ConnectionAcquire(_)) => {
            true
        }
        _ => err.is_connectivity(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_fallback_on_missing() {
        assert_eq!(
            department_with_fallback(None, "School of Law"),
            Some("School of Law".to_string())
        );
    }

    #[test]
    fn test_department_fallback_on_blank() {
        assert_eq!(
            department_with_fallback(Some("  ".into()), "School of Management"),
            Some("School of Management".to_string())
        );
    }

    #[test]
    fn test_department_kept_when_present() {
        assert_eq!(
            department_with_fallback(Some("Department of Physics".into()), "School of Science"),
            Some("Department of Physics".to_string())
        );
    }

    #[test]
    fn test_entity_failure_yields_empty_table() {
        let result: Result<Vec<SchoolRow>> = Err(EtlError::RowShape {
            table: "schools".into(),
            message: "missing column".into(),
        });
        let rows = entity_or_empty("schools", result).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_connection_failure_aborts() {
        let result: Result<Vec<SchoolRow>> = Err(EtlError::Connection {
            backend: acadlake_common::BackendKind::Mysql,
            message: "server has gone away".into(),
        });
        assert!(entity_or_empty("schools", result).is_err());
    }
}
