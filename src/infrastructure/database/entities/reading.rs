//! Reading entity
//!
//! One table for every measurement type; a row belongs to exactly one of
//! a meter or a transformer (enforced at the request boundary).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Measurement kind carried by a reading
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ReadingType {
    #[sea_orm(string_value = "current")]
    Current,
    #[sea_orm(string_value = "voltage")]
    Voltage,
    #[sea_orm(string_value = "power")]
    Power,
    #[sea_orm(string_value = "power_factor")]
    PowerFactor,
    #[sea_orm(string_value = "temperature")]
    Temperature,
    #[sea_orm(string_value = "energy_consumption")]
    EnergyConsumption,
}

impl ReadingType {
    /// Standard unit for the measurement, where one exists.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Current => Some("A"),
            Self::Voltage => Some("V"),
            Self::Power => Some("W"),
            Self::PowerFactor => None,
            Self::Temperature => Some("°C"),
            Self::EnergyConsumption => Some("kWh"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "readings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub meter_id: Option<String>,
    pub transformer_id: Option<String>,
    pub reading_type: ReadingType,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub is_estimated: bool,
    pub confidence_score: Option<f64>,
    pub source_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::meter::Entity",
        from = "Column::MeterId",
        to = "super::meter::Column::Id"
    )]
    Meter,
    #[sea_orm(
        belongs_to = "super::transformer::Entity",
        from = "Column::TransformerId",
        to = "super::transformer::Column::Id"
    )]
    Transformer,
}

impl Related<super::meter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meter.def()
    }
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
    "meter_id",
    "transformer_id",
    "reading_type",
    "value",
    "timestamp",
    "is_estimated",
    "confidence_score",
    "created_at",
    "updated_at",
];

/// Capability table: exposed field name -> column.
pub const QUERYABLE: &[(&str, Column)] = &[
    ("id", Column::Id),
    ("meter_id", Column::MeterId),
    ("transformer_id", Column::TransformerId),
    ("reading_type", Column::ReadingType),
    ("value", Column::Value),
    ("timestamp", Column::Timestamp),
    ("is_estimated", Column::IsEstimated),
    ("confidence_score", Column::ConfidenceScore),
    ("created_at", Column::CreatedAt),
    ("updated_at", Column::UpdatedAt),
];
