//! Row cleansing between extract and transform
//!
//! Trims stray whitespace out of string columns and drops exact duplicate
//! rows before aggregation.

use crate::tables::{FacultyRow, PaperRow};
use std::collections::HashSet;
use tracing::debug;

fn trimmed(value: String) -> String {
    let t = value.trim();
    if t.len() == value.len() {
        value
    } else {
        t.to_string()
    }
}

fn trimmed_opt(value: Option<String>) -> Option<String> {
    value.map(trimmed)
}

/// Trim string columns and drop exact duplicates, preserving order
pub fn clean_faculty_rows(rows: Vec<FacultyRow>) -> Vec<FacultyRow> {
    let total = rows.len();
    let mut seen = HashSet::new();
    let cleaned: Vec<FacultyRow> = rows
        .into_iter()
        .map(|mut row| {
            row.first_name = trimmed(row.first_name);
            row.middle_name = trimmed_opt(row.middle_name);
            row.last_name = trimmed(row.last_name);
            row.department_name = trimmed_opt(row.department_name);
            row.school_name = trimmed(row.school_name);
            row.position = trimmed(row.position);
            row
        })
        .filter(|row| seen.insert(row.clone()))
        .collect();

    if cleaned.len() < total {
        debug!(dropped = total - cleaned.len(), "Dropped duplicate faculty rows");
    }
    cleaned
}

/// Trim string columns and drop exact duplicates, preserving order
pub fn clean_paper_rows(rows: Vec<PaperRow>) -> Vec<PaperRow> {
    let total = rows.len();
    let mut seen = HashSet::new();
    let cleaned: Vec<PaperRow> = rows
        .into_iter()
        .map(|mut row| {
            row.first_name = trimmed_opt(row.first_name);
            row.middle_name = trimmed_opt(row.middle_name);
            row.last_name = trimmed_opt(row.last_name);
            row.department = trimmed_opt(row.department);
            row.school = trimmed_opt(row.school);
            row.paper_title = trimmed(row.paper_title);
            row.journal = trimmed_opt(row.journal);
            row
        })
        .filter(|row| seen.insert(row.clone()))
        .collect();

    if cleaned.len() < total {
        debug!(dropped = total - cleaned.len(), "Dropped duplicate paper rows");
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::AreaValue;

    fn faculty(id: i32, first: &str) -> FacultyRow {
        FacultyRow {
            faculty_id: id,
            first_name: first.to_string(),
            middle_name: None,
            last_name: "Doe".to_string(),
            normalized_name: String::new(),
            department_name: Some("  Department of Physics ".to_string()),
            school_name: "School of Science".to_string(),
            position: "Professor".to_string(),
        }
    }

    #[test]
    fn test_trims_string_columns() {
        let rows = clean_faculty_rows(vec![faculty(1, "  Ada ")]);
        assert_eq!(rows[0].first_name, "Ada");
        assert_eq!(rows[0].department_name.as_deref(), Some("Department of Physics"));
    }

    #[test]
    fn test_drops_exact_duplicates() {
        let rows = clean_faculty_rows(vec![faculty(1, "Ada"), faculty(1, "Ada"), faculty(2, "Ada")]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_paper_rows_deduplicated() {
        let paper = PaperRow {
            faculty_id: 7,
            first_name: Some("John".into()),
            middle_name: None,
            last_name: Some("Public".into()),
            department: None,
            school: Some("School of Law".into()),
            research_area: AreaValue::Scalar("Constitutional Law".into()),
            paper_title: " Landmark Rulings ".into(),
            published_year: 2021,
            journal: None,
            coauthors: None,
        };
        let rows = clean_paper_rows(vec![paper.clone(), paper]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].paper_title, "Landmark Rulings");
    }
}
