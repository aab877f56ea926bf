//! Research area entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "research_areas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Case preserved as extracted; no folding at load time
    #[sea_orm(unique)]
    pub area_name: String,
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

impl Related<super::faculty::Entity> for Entity {
    fn to() -> RelationDef {
        super::faculty_research_area::Relation::Faculty.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::faculty_research_area::Relation::ResearchArea.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
