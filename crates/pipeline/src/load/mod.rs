//! Analytical store loader
//!
//! Full-refresh load: delete everything, rebuild faculty, research areas,
//! the many-to-many relation, publications, and the analytics counters.
//! Steps run strictly in order; a failed step aborts the remainder and the
//! caller must treat the run as requiring a full re-run.

use crate::tables::{FacultyRow, PaperRow};
use crate::transform::{FacultyAnalysis, ResearchAnalysis};
use acadlake_common::errors::{EtlError, Result};
use acadlake_common::metrics;
use acadlake_common::warehouse::models::{
    FacultyActiveModel, FacultyAnalyticsActiveModel, FacultyAnalyticsEntity, FacultyEntity,
    FacultyResearchAreaActiveModel, FacultyResearchAreaEntity, PublicationActiveModel,
    PublicationEntity, ResearchAnalyticsActiveModel, ResearchAnalyticsEntity,
    ResearchAreaActiveModel, ResearchAreaEntity,
};
use acadlake_common::warehouse::WarehousePool;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::EntityTrait;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument, warn};

/// Per-table row counts for one load call
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoadSummary {
    pub faculty_rows: usize,
    pub research_areas: usize,
    pub associations: usize,
    pub publications: usize,
    pub faculty_metrics: usize,
    pub research_metrics: usize,
    /// Areas referenced by the mapping but absent from the inserted union;
    /// skipped and counted, never fatal
    pub unmapped_areas: usize,
}

/// Loader over the analytics warehouse
pub struct WarehouseLoader {
    pool: WarehousePool,
}

impl WarehouseLoader {
    pub fn new(pool: WarehousePool) -> Self {
        Self { pool }
    }

    /// Execute the full-refresh load as one logical unit.
    #[instrument(skip_all)]
    pub async fn load(
        &self,
        faculty: &[FacultyRow],
        areas_by_faculty: &BTreeMap<i32, BTreeSet<String>>,
        papers: &[PaperRow],
        faculty_analysis: &FacultyAnalysis,
        research_analysis: &ResearchAnalysis,
    ) -> Result<LoadSummary> {
        let conn = self.pool.conn();
        let mut summary = LoadSummary::default();

        // Step 1: clear the previous refresh, junction and referencing
        // tables first.
        FacultyResearchAreaEntity::delete_many()
            .exec(conn)
            .await
            .map_err(|e| load_error("clear faculty_research_area", e))?;
        PublicationEntity::delete_many()
            .exec(conn)
            .await
            .map_err(|e| load_error("clear publications", e))?;
        FacultyEntity::delete_many()
            .exec(conn)
            .await
            .map_err(|e| load_error("clear analytics_faculty", e))?;
        ResearchAreaEntity::delete_many()
            .exec(conn)
            .await
            .map_err(|e| load_error("clear research_areas", e))?;

        // Step 2: research areas from the union across all faculty, then a
        // name -> id lookup from the stored rows.
        let union = area_union(areas_by_faculty);
        summary.research_areas = union.len();

        let area_models: Vec<ResearchAreaActiveModel> = union
            .into_iter()
            .map(|area_name| ResearchAreaActiveModel {
                id: NotSet,
                area_name: Set(area_name),
            })
            .collect();
        ResearchAreaEntity::insert_many(area_models)
            .on_empty_do_nothing()
            .exec(conn)
            .await
            .map_err(|e| load_error("insert research_areas", e))?;

        let lookup: BTreeMap<String, i32> = ResearchAreaEntity::find()
            .all(conn)
            .await
            .map_err(|e| load_error("read back research_areas", e))?
            .into_iter()
            .map(|area| (area.area_name, area.id))
            .collect();

        // Step 3: faculty rows, then their research-area associations.
        summary.faculty_rows = faculty.len();
        let faculty_models: Vec<FacultyActiveModel> = faculty
            .iter()
            .map(|row| FacultyActiveModel {
                faculty_id: Set(row.faculty_id),
                first_name: Set(row.first_name.clone()),
                middle_name: Set(row.middle_name.clone()),
                last_name: Set(row.last_name.clone()),
                normalized_name: Set(row.normalized_name.clone()),
                department_name: Set(row.department_name.clone()),
                school_name: Set(row.school_name.clone()),
                position: Set(row.position.clone()),
            })
            .collect();
        FacultyEntity::insert_many(faculty_models)
            .on_empty_do_nothing()
            .exec(conn)
            .await
            .map_err(|e| load_error("insert analytics_faculty", e))?;

        let (pairs, unmapped) = association_pairs(faculty, areas_by_faculty, &lookup);
        summary.associations = pairs.len();
        summary.unmapped_areas = unmapped;

        let association_models: Vec<FacultyResearchAreaActiveModel> = pairs
            .into_iter()
            .map(|(faculty_id, research_area_id)| FacultyResearchAreaActiveModel {
                faculty_id: Set(faculty_id),
                research_area_id: Set(research_area_id),
            })
            .collect();
        FacultyResearchAreaEntity::insert_many(association_models)
            .on_empty_do_nothing()
            .exec(conn)
            .await
            .map_err(|e| load_error("insert faculty_research_area", e))?;

        // Step 4: publications, faculty_id preserved as extracted.
        summary.publications = papers.len();
        let publication_models: Vec<PublicationActiveModel> = papers
            .iter()
            .map(|row| PublicationActiveModel {
                id: NotSet,
                faculty_id: Set(row.faculty_id),
                paper_title: Set(row.paper_title.clone()),
                published_year: Set(row.published_year),
                journal: Set(row.journal.clone()),
                coauthors: Set(row.coauthors.clone()),
            })
            .collect();
        PublicationEntity::insert_many(publication_models)
            .on_empty_do_nothing()
            .exec(conn)
            .await
            .map_err(|e| load_error("insert publications", e))?;

        // Step 5: replace the analytics counters.
        FacultyAnalyticsEntity::delete_many()
            .exec(conn)
            .await
            .map_err(|e| load_error("clear faculty_analytics", e))?;
        ResearchAnalyticsEntity::delete_many()
            .exec(conn)
            .await
            .map_err(|e| load_error("clear research_analytics", e))?;

        let faculty_rows = faculty_metric_rows(faculty_analysis);
        summary.faculty_metrics = faculty_rows.len();
        let faculty_models: Vec<FacultyAnalyticsActiveModel> = faculty_rows
            .into_iter()
            .map(|(metric_name, metric_value, count)| FacultyAnalyticsActiveModel {
                id: NotSet,
                metric_name: Set(metric_name),
                metric_value: Set(metric_value),
                count: Set(count),
            })
            .collect();
        FacultyAnalyticsEntity::insert_many(faculty_models)
            .on_empty_do_nothing()
            .exec(conn)
            .await
            .map_err(|e| load_error("insert faculty_analytics", e))?;

        let research_rows = research_metric_rows(research_analysis);
        summary.research_metrics = research_rows.len();
        let research_models: Vec<ResearchAnalyticsActiveModel> = research_rows
            .into_iter()
            .map(|(metric_name, metric_value, count)| ResearchAnalyticsActiveModel {
                id: NotSet,
                metric_name: Set(metric_name),
                metric_value: Set(metric_value),
                count: Set(count),
            })
            .collect();
        ResearchAnalyticsEntity::insert_many(research_models)
            .on_empty_do_nothing()
            .exec(conn)
            .await
            .map_err(|e| load_error("insert research_analytics", e))?;

        metrics::record_loaded("analytics_faculty", summary.faculty_rows);
        metrics::record_loaded("research_areas", summary.research_areas);
        metrics::record_loaded("faculty_research_area", summary.associations);
        metrics::record_loaded("publications", summary.publications);
        metrics::record_loaded("faculty_analytics", summary.faculty_metrics);
        metrics::record_loaded("research_analytics", summary.research_metrics);

        info!(
            faculty = summary.faculty_rows,
            research_areas = summary.research_areas,
            associations = summary.associations,
            publications = summary.publications,
            "warehouse load complete"
        );

        Ok(summary)
    }
}

fn load_error(step: &str, err: sea_orm::DbErr) -> EtlError {
    EtlError::Load {
        step: step.to_string(),
        message: err.to_string(),
    }
}

/// Union of every research area referenced across the mapping. Must be a
/// superset of the areas referenced during association building.
pub fn area_union(areas_by_faculty: &BTreeMap<i32, BTreeSet<String>>) -> BTreeSet<String> {
    areas_by_faculty.values().flatten().cloned().collect()
}

/// Association rows for each loaded faculty member. An area missing from the
/// lookup is an invariant violation: it is skipped, logged, and counted.
pub fn association_pairs(
    faculty: &[FacultyRow],
    areas_by_faculty: &BTreeMap<i32, BTreeSet<String>>,
    lookup: &BTreeMap<String, i32>,
) -> (Vec<(i32, i32)>, usize) {
    let mut pairs = Vec::new();
    let mut unmapped = 0usize;

    for row in faculty {
        let Some(areas) = areas_by_faculty.get(&row.faculty_id) else {
            continue;
        };
        for area in areas {
            match lookup.get(area) {
                Some(&area_id) => pairs.push((row.faculty_id, area_id)),
                None => {
                    warn!(
                        faculty_id = row.faculty_id,
                        area, "research area missing from lookup; association skipped"
                    );
                    metrics::record_anomaly("unmapped_research_area");
                    unmapped += 1;
                }
            }
        }
    }
    (pairs, unmapped)
}

/// Flattened faculty counters: one row per (metric_name, metric_value)
pub fn faculty_metric_rows(analysis: &FacultyAnalysis) -> Vec<(String, String, i32)> {
    let mut rows = Vec::new();
    for (position, count) in &analysis.position_counts {
        rows.push(("position".to_string(), position.clone(), *count as i32));
    }
    for (department, count) in &analysis.department_counts {
        rows.push(("department".to_string(), department.clone(), *count as i32));
    }
    for (school, count) in &analysis.school_counts {
        rows.push(("school".to_string(), school.clone(), *count as i32));
    }
    rows
}

/// Flattened research counters: publication years and research areas
pub fn research_metric_rows(analysis: &ResearchAnalysis) -> Vec<(String, String, i32)> {
    let mut rows = Vec::new();
    for (year, count) in &analysis.year_counts {
        rows.push((
            "publication_year".to_string(),
            year.to_string(),
            *count as i32,
        ));
    }
    for (area, count) in &analysis.area_counts {
        rows.push(("research_area".to_string(), area.clone(), *count as i32));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faculty_row(id: i32) -> FacultyRow {
        FacultyRow {
            faculty_id: id,
            first_name: "A".into(),
            middle_name: None,
            last_name: "B".into(),
            normalized_name: "a b".into(),
            department_name: Some("Department of Physics".into()),
            school_name: "School of Science".into(),
            position: "Professor".into(),
        }
    }

    fn mapping(entries: &[(i32, &[&str])]) -> BTreeMap<i32, BTreeSet<String>> {
        entries
            .iter()
            .map(|(id, areas)| (*id, areas.iter().map(|a| a.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_area_union_round_trip() {
        // {A,B} for F1 and {B,C} for F2 -> exactly three distinct areas
        let m = mapping(&[(1, &["A", "B"]), (2, &["B", "C"])]);
        let union = area_union(&m);
        assert_eq!(
            union.into_iter().collect::<Vec<_>>(),
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_association_pairs_exact() {
        let m = mapping(&[(1, &["A", "B"]), (2, &["B", "C"])]);
        let lookup: BTreeMap<String, i32> =
            [("A".to_string(), 10), ("B".to_string(), 11), ("C".to_string(), 12)]
                .into_iter()
                .collect();

        let (pairs, unmapped) = association_pairs(&[faculty_row(1), faculty_row(2)], &m, &lookup);
        assert_eq!(unmapped, 0);
        assert_eq!(pairs, vec![(1, 10), (1, 11), (2, 11), (2, 12)]);
    }

    #[test]
    fn test_unmapped_area_skipped_and_counted() {
        let m = mapping(&[(1, &["A", "Ghost"])]);
        let lookup: BTreeMap<String, i32> = [("A".to_string(), 10)].into_iter().collect();

        let (pairs, unmapped) = association_pairs(&[faculty_row(1)], &m, &lookup);
        assert_eq!(pairs, vec![(1, 10)]);
        assert_eq!(unmapped, 1);
    }

    #[test]
    fn test_faculty_without_mapping_entry_gets_no_pairs() {
        let m = mapping(&[(2, &["A"])]);
        let lookup: BTreeMap<String, i32> = [("A".to_string(), 10)].into_iter().collect();

        let (pairs, unmapped) = association_pairs(&[faculty_row(1)], &m, &lookup);
        assert!(pairs.is_empty());
        assert_eq!(unmapped, 0);
    }

    #[test]
    fn test_metric_rows_flattened() {
        let mut analysis = FacultyAnalysis::default();
        analysis.total_faculty = 3;
        analysis.position_counts.insert("professor".into(), 2);
        analysis.position_counts.insert("lecturer".into(), 1);
        analysis.department_counts.insert("department of physics".into(), 3);
        analysis.school_counts.insert("school of science".into(), 3);

        let rows = faculty_metric_rows(&analysis);
        assert_eq!(rows.len(), 4);
        assert!(rows.contains(&("position".into(), "professor".into(), 2)));
        assert!(rows.contains(&("school".into(), "school of science".into(), 3)));
    }

    #[test]
    fn test_research_metric_rows_stringify_years() {
        let mut analysis = ResearchAnalysis::default();
        analysis.year_counts.insert(2020, 5);
        analysis.area_counts.insert("Optics".into(), 2);

        let rows = research_metric_rows(&analysis);
        assert!(rows.contains(&("publication_year".into(), "2020".into(), 5)));
        assert!(rows.contains(&("research_area".into(), "Optics".into(), 2)));
    }

    #[test]
    fn test_plan_is_idempotent_for_identical_input() {
        let m = mapping(&[(1, &["A", "B"]), (2, &["B", "C"])]);
        let lookup: BTreeMap<String, i32> =
            [("A".to_string(), 1), ("B".to_string(), 2), ("C".to_string(), 3)]
                .into_iter()
                .collect();
        let faculty = vec![faculty_row(1), faculty_row(2)];

        let first = association_pairs(&faculty, &m, &lookup);
        let second = association_pairs(&faculty, &m, &lookup);
        assert_eq!(first, second);
        assert_eq!(area_union(&m), area_union(&m));
    }
}
