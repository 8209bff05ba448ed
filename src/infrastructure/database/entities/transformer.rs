//! Transformer entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transformers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub coverage_area_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::coverage_area::Entity",
        from = "Column::CoverageAreaId",
        to = "super::coverage_area::Column::Id"
    )]
    CoverageArea,
    #[sea_orm(has_many = "super::meter::Entity")]
    Meters,
}

impl Related<super::coverage_area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoverageArea.def()
    }
}

impl Related<super::meter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields exposed to list filtering and sorting.
pub const ALLOWED_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "coverage_area_id",
    "created_at",
    "updated_at",
];

/// Capability table: exposed field name -> column.
pub const QUERYABLE: &[(&str, Column)] = &[
    ("id", Column::Id),
    ("name", Column::Name),
    ("description", Column::Description),
    ("coverage_area_id", Column::CoverageAreaId),
    ("created_at", Column::CreatedAt),
    ("updated_at", Column::UpdatedAt),
];

/// Fields covered by the `search` parameter.
pub const SEARCH_FIELDS: &[&str] = &["name", "description"];
