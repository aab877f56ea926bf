//! Publication entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Reference into analytics_faculty, preserved as extracted.
    /// Not DB-enforced: source documents may reference faculty ids the
    /// relational source no longer carries.
    pub faculty_id: i32,

    #[sea_orm(column_type = "Text")]
    pub paper_title: String,

    pub published_year: i32,

    pub journal: Option<String>,

    /// Co-author names serialized as free text
    #[sea_orm(column_type = "Text", nullable)]
    pub coauthors: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
