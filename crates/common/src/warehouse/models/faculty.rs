//! Faculty entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "analytics_faculty")]
pub struct Model {
    /// Source-assigned identifier, preserved across refreshes
    #[sea_orm(primary_key, auto_increment = false)]
    pub faculty_id: i32,

    pub first_name: String,

    pub middle_name: Option<String>,

    pub last_name: String,

    /// Lower-cased, single-spaced concatenation of the non-empty name parts
    pub normalized_name: String,

    /// Falls back to the school for schools without departments
    pub department_name: Option<String>,

    pub school_name: String,

    pub position: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::faculty_research_area::Entity")]
    FacultyResearchAreas,
}

impl Related<super::faculty_research_area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FacultyResearchAreas.def()
    }
}

impl Related<super::research_area::Entity> for Entity {
    fn to() -> RelationDef {
        super::faculty_research_area::Relation::ResearchArea.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::faculty_research_area::Relation::Faculty.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
