//! Faculty transformer
//!
//! Name normalization plus the categorical breakdowns the dashboard reads.

use crate::tables::FacultyRow;
use crate::transform::tally;
use serde::Serialize;
use std::collections::BTreeMap;

/// Analytics-ready faculty summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacultyAnalysis {
    pub total_faculty: usize,
    pub position_counts: BTreeMap<String, u64>,
    pub department_counts: BTreeMap<String, u64>,
    pub school_counts: BTreeMap<String, u64>,
}

/// Lower-cased, single-spaced concatenation of the non-empty name parts
pub fn normalized_name(first: &str, middle: Option<&str>, last: &str) -> String {
    let mut parts = Vec::with_capacity(3);
    for part in [Some(first), middle, Some(last)].into_iter().flatten() {
        let cleaned = part.trim().to_lowercase();
        if !cleaned.is_empty() {
            parts.push(cleaned);
        }
    }
    parts.join(" ")
}

/// Fill the normalized_name column. Pure; no other column changes.
pub fn normalize_faculty_names(rows: Vec<FacultyRow>) -> Vec<FacultyRow> {
    rows.into_iter()
        .map(|mut row| {
            row.normalized_name = normalized_name(
                &row.first_name,
                row.middle_name.as_deref(),
                &row.last_name,
            );
            row
        })
        .collect()
}

/// Total count plus case-folded breakdowns by position, department, school.
/// Empty input yields the zero analysis, not an error.
pub fn transform_faculty_data(rows: &[FacultyRow]) -> FacultyAnalysis {
    if rows.is_empty() {
        return FacultyAnalysis::default();
    }

    let mut analysis = FacultyAnalysis {
        total_faculty: rows.len(),
        ..FacultyAnalysis::default()
    };

    for row in rows {
        tally(&mut analysis.position_counts, row.position.to_lowercase());
        if let Some(department) = &row.department_name {
            tally(&mut analysis.department_counts, department.to_lowercase());
        }
        tally(&mut analysis.school_counts, row.school_name.to_lowercase());
    }
    analysis
}
