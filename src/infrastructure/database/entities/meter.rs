//! Meter entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub transformer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transformer::Entity",
        from = "Column::TransformerId",
        to = "super::transformer::Column::Id"
    )]
    Transformer,
}

impl Related<super::transformer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transformer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields exposed to list filtering and sorting.
pub const ALLOWED_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "transformer_id",
    "created_at",
    "updated_at",
];

/// Capability table: exposed field name -> column.
pub const QUERYABLE: &[(&str, Column)] = &[
    ("id", Column::Id),
    ("name", Column::Name),
    ("description", Column::Description),
    ("transformer_id", Column::TransformerId),
    ("created_at", Column::CreatedAt),
    ("updated_at", Column::UpdatedAt),
];

/// Fields covered by the `search` parameter.
pub const SEARCH_FIELDS: &[&str] = &["name", "description"];
