//! Faculty analytics counter entity
//!
//! Flattened (metric_name, metric_value, count) rows; rows sharing a
//! metric_name form one categorical breakdown.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faculty_analytics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub metric_name: String,

    pub metric_value: String,

    pub count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
