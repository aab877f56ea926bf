//! In-memory tabular forms passed between pipeline stages
//!
//! Extractors fill these row types, transformers aggregate them, and the
//! loader maps them onto warehouse entities.

use serde::{Deserialize, Serialize};

/// One faculty member from the relational source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacultyRow {
    pub faculty_id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Filled by the faculty transformer; empty until then
    #[serde(default)]
    pub normalized_name: String,
    /// Already back-filled with the school for schools without departments
    pub department_name: Option<String>,
    pub school_name: String,
    pub position: String,
}

/// One department from the relational source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentRow {
    pub department_name: String,
    pub school_name: String,
    pub number_of_faculty: i32,
}

/// One school from the relational source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchoolRow {
    pub school_name: String,
}

/// One research paper, flattened from a per-faculty document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaperRow {
    pub faculty_id: i32,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    /// Falls back to the school when absent or the "NULL" sentinel
    pub department: Option<String>,
    pub school: Option<String>,
    pub research_area: AreaValue,
    pub paper_title: String,
    pub published_year: i32,
    pub journal: Option<String>,
    /// Co-author names serialized as free text
    pub coauthors: Option<String>,
}

/// Research-area field as stored in source documents: either a single string
/// (possibly comma-separated) or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AreaValue {
    Scalar(String),
    List(Vec<String>),
}

impl AreaValue {
    pub fn empty() -> Self {
        AreaValue::List(Vec::new())
    }

    /// Values as counted by the research breakdown: a scalar contributes a
    /// single key, a list contributes one key per element.
    pub fn count_values(&self) -> Vec<&str> {
        match self {
            AreaValue::Scalar(s) => vec![s.as_str()],
            AreaValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Values as resolved for the faculty -> areas mapping: comma-separated
    /// scalars are split and trimmed, lists are used as-is.
    pub fn set_values(&self) -> Vec<String> {
        match self {
            AreaValue::Scalar(s) => s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
            AreaValue::List(items) => items.clone(),
        }
    }
}

impl Default for AreaValue {
    fn default() -> Self {
        AreaValue::empty()
    }
}

/// Name parts split from a stored full-name string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitName {
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
}

impl SplitName {
    /// A name resolved into fewer than two parts is a quality anomaly
    pub fn is_partial(&self) -> bool {
        self.last.is_none()
    }
}

/// Split a full-name string on whitespace.
///
/// First token becomes the first name, the last token the last name, and
/// anything between joins into the middle name. One token yields a first
/// name only; callers count that as an anomaly rather than dropping the row.
pub fn split_full_name(full_name: &str) -> SplitName {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => SplitName::default(),
        [first] => SplitName {
            first: Some(first.to_string()),
            middle: None,
            last: None,
        },
        [first, last] => SplitName {
            first: Some(first.to_string()),
            middle: None,
            last: Some(last.to_string()),
        },
        [first, middle @ .., last] => SplitName {
            first: Some(first.to_string()),
            middle: Some(middle.join(" ")),
            last: Some(last.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_two_tokens() {
        let name = split_full_name("Jane Doe");
        assert_eq!(name.first.as_deref(), Some("Jane"));
        assert_eq!(name.middle, None);
        assert_eq!(name.last.as_deref(), Some("Doe"));
        assert!(!name.is_partial());
    }

    #[test]
    fn test_split_three_tokens() {
        let name = split_full_name("John Q Public");
        assert_eq!(name.first.as_deref(), Some("John"));
        assert_eq!(name.middle.as_deref(), Some("Q"));
        assert_eq!(name.last.as_deref(), Some("Public"));
    }

    #[test]
    fn test_split_four_tokens_joins_middle() {
        let name = split_full_name("Maria de la Cruz");
        assert_eq!(name.first.as_deref(), Some("Maria"));
        assert_eq!(name.middle.as_deref(), Some("de la"));
        assert_eq!(name.last.as_deref(), Some("Cruz"));
    }

    #[test]
    fn test_split_single_token_is_partial() {
        let name = split_full_name("Cher");
        assert_eq!(name.first.as_deref(), Some("Cher"));
        assert_eq!(name.last, None);
        assert!(name.is_partial());
    }

    #[test]
    fn test_split_empty_string() {
        let name = split_full_name("   ");
        assert_eq!(name, SplitName::default());
        assert!(name.is_partial());
    }

    #[test]
    fn test_area_scalar_counts_once() {
        let area = AreaValue::Scalar("Machine Learning, Computer Vision".into());
        assert_eq!(area.count_values().len(), 1);
        assert_eq!(
            area.set_values(),
            vec!["Machine Learning".to_string(), "Computer Vision".to_string()]
        );
    }

    #[test]
    fn test_area_list_explodes() {
        let area = AreaValue::List(vec!["Topology".into(), "Graph Theory".into()]);
        assert_eq!(area.count_values(), vec!["Topology", "Graph Theory"]);
        assert_eq!(area.set_values().len(), 2);
    }

    #[test]
    fn test_area_untagged_deserialization() {
        let scalar: AreaValue = serde_json::from_str(r#""Optics""#).unwrap();
        assert_eq!(scalar, AreaValue::Scalar("Optics".into()));

        let list: AreaValue = serde_json::from_str(r#"["Optics", "Plasma Physics"]"#).unwrap();
        assert_eq!(
            list,
            AreaValue::List(vec!["Optics".into(), "Plasma Physics".into()])
        );
    }
}
