//! Research transformer
//!
//! Publication breakdowns and the faculty -> research-area mapping the
//! loader materializes as the many-to-many relation.

use crate::tables::PaperRow;
use crate::transform::tally;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Analytics-ready research summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResearchAnalysis {
    pub total_publications: usize,
    pub year_counts: BTreeMap<i32, u64>,
    pub area_counts: BTreeMap<String, u64>,
    pub department_counts: BTreeMap<String, u64>,
    pub school_counts: BTreeMap<String, u64>,
}

/// Total publication count plus breakdowns by year, research area,
/// department, and school. List-valued areas are exploded so each element
/// contributes one count; a scalar contributes a single count.
pub fn transform_research_data(rows: &[PaperRow]) -> ResearchAnalysis {
    if rows.is_empty() {
        return ResearchAnalysis::default();
    }

    let mut analysis = ResearchAnalysis {
        total_publications: rows.len(),
        ..ResearchAnalysis::default()
    };

    for row in rows {
        tally(&mut analysis.year_counts, row.published_year);
        for area in row.research_area.count_values() {
            tally(&mut analysis.area_counts, area.to_string());
        }
        if let Some(department) = &row.department {
            tally(&mut analysis.department_counts, department.clone());
        }
        if let Some(school) = &row.school {
            tally(&mut analysis.school_counts, school.clone());
        }
    }
    analysis
}

/// Map each faculty_id to the deduplicated set of research areas observed
/// across its papers. Comma-separated strings are split and trimmed; lists
/// are used as-is. The result is order-independent.
pub fn research_areas_by_faculty(rows: &[PaperRow]) -> BTreeMap<i32, BTreeSet<String>> {
    let mut mapping: BTreeMap<i32, BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        mapping
            .entry(row.faculty_id)
            .or_default()
            .extend(row.research_area.set_values());
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::AreaValue;

    fn paper(faculty_id: i32, year: i32, area: AreaValue) -> PaperRow {
        PaperRow {
            faculty_id,
            first_name: Some("A".into()),
            middle_name: None,
            last_name: Some("B".into()),
            department: Some("Department of Computer Science and Engineering".into()),
            school: Some("School of Engineering".into()),
            research_area: area,
            paper_title: "T".into(),
            published_year: year,
            journal: None,
            coauthors: None,
        }
    }

    #[test]
    fn test_explosion_preserves_occurrence_count() {
        let rows = vec![
            paper(1, 2020, AreaValue::Scalar("Machine Learning, NLP".into())),
            paper(2, 2021, AreaValue::List(vec!["Optics".into(), "Plasma Physics".into()])),
            paper(3, 2021, AreaValue::List(vec!["Optics".into()])),
        ];

        let analysis = transform_research_data(&rows);
        let total: u64 = analysis.area_counts.values().sum();
        // scalar row contributes 1, list rows contribute their lengths
        assert_eq!(total, 1 + 2 + 1);
        assert_eq!(analysis.area_counts.get("Optics"), Some(&2));
        assert_eq!(
            analysis.area_counts.get("Machine Learning, NLP"),
            Some(&1)
        );
    }

    #[test]
    fn test_year_counts() {
        let rows = vec![
            paper(1, 2020, AreaValue::empty()),
            paper(2, 2021, AreaValue::empty()),
            paper(3, 2021, AreaValue::empty()),
        ];

        let analysis = transform_research_data(&rows);
        assert_eq!(analysis.total_publications, 3);
        assert_eq!(analysis.year_counts.get(&2021), Some(&2));
        assert_eq!(analysis.year_counts.get(&2020), Some(&1));
    }

    #[test]
    fn test_empty_input_yields_zero_analysis() {
        assert_eq!(transform_research_data(&[]), ResearchAnalysis::default());
    }

    #[test]
    fn test_mapping_deduplicates_across_papers() {
        let rows = vec![
            paper(7, 2020, AreaValue::Scalar("Topology, Graph Theory".into())),
            paper(7, 2021, AreaValue::List(vec!["Graph Theory".into()])),
        ];

        let mapping = research_areas_by_faculty(&rows);
        let areas = mapping.get(&7).unwrap();
        assert_eq!(areas.len(), 2);
        assert!(areas.contains("Topology"));
        assert!(areas.contains("Graph Theory"));
    }

    #[test]
    fn test_mapping_is_order_independent() {
        let a = paper(7, 2020, AreaValue::Scalar("Topology".into()));
        let b = paper(7, 2021, AreaValue::List(vec!["Graph Theory".into()]));

        let forward = research_areas_by_faculty(&[a.clone(), b.clone()]);
        let reversed = research_areas_by_faculty(&[b, a]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_comma_splitting_trims_whitespace() {
        let rows = vec![paper(1, 2020, AreaValue::Scalar("Topology ,  Graph Theory".into()))];
        let mapping = research_areas_by_faculty(&rows);
        let areas = mapping.get(&1).unwrap();
        assert!(areas.contains("Topology"));
        assert!(areas.contains("Graph Theory"));
    }
}
