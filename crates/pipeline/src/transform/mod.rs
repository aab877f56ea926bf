//! Transformers
//!
//! Pure aggregation over the extracted tables: no I/O, no mutation of
//! columns other than the ones each operation documents.

pub mod faculty;
pub mod research;

pub use faculty::{normalize_faculty_names, transform_faculty_data, FacultyAnalysis};
pub use research::{research_areas_by_faculty, transform_research_data, ResearchAnalysis};

use std::collections::BTreeMap;

pub(crate) fn tally<K: Ord>(map: &mut BTreeMap<K, u64>, key: K) {
    *map.entry(key).or_insert(0) += 1;
}
