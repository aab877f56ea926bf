//! Faculty <-> research area junction entity
//!
//! Rebuilt in full on every load; no incremental diffing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faculty_research_area")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub faculty_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub research_area_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::faculty::Entity",
        from = "Column::FacultyId",
        to = "super::faculty::Column::FacultyId"
    )]
    Faculty,

    #[sea_orm(
        belongs_to = "super::research_area::Entity",
        from = "Column::ResearchAreaId",
        to = "super::research_area::Column::Id"
    )]
    ResearchArea,
}

impl Related<super::faculty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::research_area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchArea.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
