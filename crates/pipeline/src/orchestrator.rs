//! Pipeline orchestrator
//!
//! Sequences probe -> extract -> transform -> load with fail-fast error
//! surfacing. Each run is a full restart: the loader is full-refresh, so
//! re-running after a failure is always safe. No retries are attempted.

use crate::errors::PipelineError;
use crate::extract::{DocumentExtractor, Extractor, SqlExtractor};
use crate::load::{LoadSummary, WarehouseLoader};
use crate::transform;
use crate::validate;
use acadlake_common::config::AppConfig;
use acadlake_common::connect::{self, ConnectionParams};
use acadlake_common::errors::EtlError;
use acadlake_common::metrics;
use acadlake_common::warehouse::WarehousePool;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Stages of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Init,
    ProbeSql,
    ProbeDocument,
    ProbeWarehouse,
    Extract,
    Transform,
    Load,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Init => "init",
            PipelineStage::ProbeSql => "probe_sql",
            PipelineStage::ProbeDocument => "probe_document",
            PipelineStage::ProbeWarehouse => "probe_analytical",
            PipelineStage::Extract => "extract",
            PipelineStage::Transform => "transform",
            PipelineStage::Load => "load",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub stage: PipelineStage,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub faculty_extracted: usize,
    pub departments_extracted: usize,
    pub schools_extracted: usize,
    pub papers_extracted: usize,
    pub load: LoadSummary,
}

impl RunReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Sequential, batch-oriented ETL run over the configured backends.
///
/// Owns every component lifecycle: extractors and the warehouse pool are
/// created when the run starts and dropped when it ends.
pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline once, recording the outcome.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let timer = Instant::now();
        match self.execute().await {
            Ok(report) => {
                metrics::record_run("success", timer.elapsed().as_secs_f64());
                Ok(report)
            }
            Err(err) => {
                metrics::record_run("failed", timer.elapsed().as_secs_f64());
                error!(stage = %err.stage(), error = %err, "pipeline halted");
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    async fn execute(&self) -> Result<RunReport, PipelineError> {
        let started_at = Utc::now();

        // Every backend must answer its probe before any extraction begins.
        self.probe_stage(PipelineStage::ProbeSql, &self.config.faculty_source)
            .await?;
        self.probe_stage(
            PipelineStage::ProbeDocument,
            &self.config.research_source.connection,
        )
        .await?;
        self.probe_stage(
            PipelineStage::ProbeWarehouse,
            &self.config.warehouse.connection,
        )
        .await?;

        // Extract, one backend after the other.
        let stage_timer = Instant::now();

        let mut sql_extractor = SqlExtractor::new(self.config.faculty_source.clone());
        if !sql_extractor.connect().await {
            return Err(PipelineError::at(PipelineStage::Extract)(
                EtlError::Connection {
                    backend: self.config.faculty_source.db_type,
                    message: "relational source connection failed".to_string(),
                },
            ));
        }
        let (faculty, departments, schools) = sql_extractor
            .extract()
            .await
            .map_err(PipelineError::at(PipelineStage::Extract))?;

        let mut document_extractor = DocumentExtractor::new(
            self.config.research_source.connection.clone(),
            self.config.research_source.collection.clone(),
        );
        if !document_extractor.connect().await {
            return Err(PipelineError::at(PipelineStage::Extract)(
                EtlError::Connection {
                    backend: self.config.research_source.connection.db_type,
                    message: "document store connection failed".to_string(),
                },
            ));
        }
        let papers = document_extractor
            .extract()
            .await
            .map_err(PipelineError::at(PipelineStage::Extract))?;

        metrics::record_extracted("faculty", faculty.len());
        metrics::record_extracted("departments", departments.len());
        metrics::record_extracted("schools", schools.len());
        metrics::record_extracted("papers", papers.len());
        metrics::record_stage("extract", stage_timer.elapsed().as_secs_f64());

        let report_counts = (
            faculty.len(),
            departments.len(),
            schools.len(),
            papers.len(),
        );

        // Transform: cleanse, normalize, aggregate.
        let stage_timer = Instant::now();
        let faculty = validate::clean_faculty_rows(faculty);
        let papers = validate::clean_paper_rows(papers);

        let faculty = transform::normalize_faculty_names(faculty);
        let faculty_analysis = transform::transform_faculty_data(&faculty);
        let research_analysis = transform::transform_research_data(&papers);
        let areas_by_faculty = transform::research_areas_by_faculty(&papers);

        info!(
            faculty = faculty.len(),
            papers = papers.len(),
            research_areas = areas_by_faculty.values().flatten().count(),
            "transform complete"
        );
        metrics::record_stage("transform", stage_timer.elapsed().as_secs_f64());

        // Load the warehouse, full refresh.
        let stage_timer = Instant::now();

        let pool = WarehousePool::new(&self.config.warehouse)
            .await
            .map_err(PipelineError::at(PipelineStage::Load))?;
        let loader = WarehouseLoader::new(pool.clone());
        let summary = loader
            .load(
                &faculty,
                &areas_by_faculty,
                &papers,
                &faculty_analysis,
                &research_analysis,
            )
            .await
            .map_err(PipelineError::at(PipelineStage::Load))?;
        drop(loader);
        pool.close()
            .await
            .map_err(PipelineError::at(PipelineStage::Load))?;

        metrics::record_stage("load", stage_timer.elapsed().as_secs_f64());

        let (faculty_extracted, departments_extracted, schools_extracted, papers_extracted) =
            report_counts;
        Ok(RunReport {
            stage: PipelineStage::Done,
            started_at,
            finished_at: Utc::now(),
            faculty_extracted,
            departments_extracted,
            schools_extracted,
            papers_extracted,
            load: summary,
        })
    }

    async fn probe_stage(
        &self,
        stage: PipelineStage,
        params: &ConnectionParams,
    ) -> Result<(), PipelineError> {
        let timer = Instant::now();
        let outcome = connect::probe(params).await;
        metrics::record_stage(stage.as_str(), timer.elapsed().as_secs_f64());

        if outcome.success {
            info!(stage = %stage, backend = %params.db_type, "probe healthy");
            Ok(())
        } else {
            Err(PipelineError::ProbeFailed {
                stage,
                backend: params.db_type,
                status: outcome.status,
            })
        }
    }
}
