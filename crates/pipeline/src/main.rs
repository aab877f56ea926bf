//! Acadlake ETL Pipeline
//!
//! One full-refresh batch run:
//! 1. Probes the relational source, document store, and warehouse
//! 2. Extracts faculty/department/school tables and research documents
//! 3. Normalizes and aggregates them into analytics-ready summaries
//! 4. Rebuilds the warehouse tables and analytics counters

use acadlake_common::{config::AppConfig, metrics, VERSION};
use acadlake_pipeline::Pipeline;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.observability.log_level.clone()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.observability.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting Acadlake pipeline v{}", VERSION);

    metrics::register_metrics();

    let pipeline = Pipeline::new(config);
    match pipeline.run().await {
        Ok(report) => {
            info!(
                faculty = report.faculty_extracted,
                papers = report.papers_extracted,
                publications = report.load.publications,
                research_areas = report.load.research_areas,
                unmapped_areas = report.load.unmapped_areas,
                duration_ms = report.duration().num_milliseconds(),
                "Pipeline run complete"
            );
        }
        Err(err) => {
            tracing::error!(stage = %err.stage(), error = %err, "Pipeline run failed");
            std::process::exit(1);
        }
    }

    Ok(())
}
