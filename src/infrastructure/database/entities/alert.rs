//! Alert entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Alert severity / lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[sea_orm(string_value = "info")]
    Info,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "error")]
    Error,
    #[sea_orm(string_value = "critical")]
    Critical,
    #[sea_orm(string_value = "expired")]
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields exposed to list filtering and sorting.
pub const ALLOWED_FIELDS: &[&str] = &[
    "id",
    "title",
    "message",
    "status",
    "created_at",
    "updated_at",
];

/// Capability table: exposed field name -> column.
pub const QUERYABLE: &[(&str, Column)] = &[
    ("id", Column::Id),
    ("title", Column::Title),
    ("message", Column::Message),
    ("status", Column::Status),
    ("created_at", Column::CreatedAt),
    ("updated_at", Column::UpdatedAt),
];

/// Fields covered by the `search` parameter.
pub const SEARCH_FIELDS: &[&str] = &["title", "message", "status"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_and_capability_table_agree() {
        let queryable: Vec<&str> = QUERYABLE.iter().map(|(name, _)| *name).collect();
        assert_eq!(queryable, ALLOWED_FIELDS);
    }
}
