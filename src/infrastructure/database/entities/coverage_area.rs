//! Coverage area entity
//!
//! Areas form a hierarchy (country down to village) through the
//! self-referential `parent_id`.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Administrative level of a coverage area
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
#[serde(rename_all = "kebab-case")]
pub enum CoverageAreaType {
    #[sea_orm(string_value = "country")]
    Country,
    #[sea_orm(string_value = "province")]
    Province,
    #[sea_orm(string_value = "district")]
    District,
    #[sea_orm(string_value = "sub-district")]
    SubDistrict,
    #[sea_orm(string_value = "village")]
    Village,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coverage_areas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "type")]
    pub area_type: CoverageAreaType,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::transformer::Entity")]
    Transformers,
}

impl Related<super::transformer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transformers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields exposed to list filtering and sorting.
pub const ALLOWED_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "type",
    "parent_id",
    "created_at",
    "updated_at",
];

/// Capability table: exposed field name -> column.
pub const QUERYABLE: &[(&str, Column)] = &[
    ("id", Column::Id),
    ("name", Column::Name),
    ("description", Column::Description),
    ("type", Column::AreaType),
    ("parent_id", Column::ParentId),
    ("created_at", Column::CreatedAt),
    ("updated_at", Column::UpdatedAt),
];

/// Fields covered by the `search` parameter.
pub const SEARCH_FIELDS: &[&str] = &["name", "description", "type"];
