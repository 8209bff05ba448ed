//! Reading DTOs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::infrastructure::database::entities::reading::{self, ReadingType};

pub fn reading_type_to_str(t: &ReadingType) -> &'static str {
    match t {
        ReadingType::Current => "current",
        ReadingType::Voltage => "voltage",
        ReadingType::Power => "power",
        ReadingType::PowerFactor => "power_factor",
        ReadingType::Temperature => "temperature",
        ReadingType::EnergyConsumption => "energy_consumption",
    }
}

pub fn parse_reading_type(s: &str) -> Option<ReadingType> {
    match s.to_lowercase().as_str() {
        "current" => Some(ReadingType::Current),
        "voltage" => Some(ReadingType::Voltage),
        "power" => Some(ReadingType::Power),
        "power_factor" => Some(ReadingType::PowerFactor),
        "temperature" => Some(ReadingType::Temperature),
        "energy_consumption" => Some(ReadingType::EnergyConsumption),
        _ => None,
    }
}

/// Reading API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformer_id: Option<String>,
    pub reading_type: String,
    /// Standard unit for the reading type, where one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub is_estimated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<reading::Model> for ReadingDto {
    fn from(r: reading::Model) -> Self {
        Self {
            id: r.id,
            meter_id: r.meter_id,
            transformer_id: r.transformer_id,
            unit: r.reading_type.unit().map(str::to_string),
            reading_type: reading_type_to_str(&r.reading_type).to_string(),
            value: r.value,
            timestamp: r.timestamp,
            is_estimated: r.is_estimated,
            confidence_score: r.confidence_score,
            source_info: r.source_info,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Create reading request. Exactly one of `meter_id` / `transformer_id`
/// must be set.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReadingRequest {
    pub meter_id: Option<String>,
    pub transformer_id: Option<String>,
    pub reading_type: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_estimated: bool,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_score: Option<f64>,
    #[validate(length(max = 200))]
    pub source_info: Option<String>,
}

impl CreateReadingRequest {
    /// A reading belongs to exactly one source.
    pub fn source_error(&self) -> Option<&'static str> {
        match (&self.meter_id, &self.transformer_id) {
            (None, None) => Some("A reading must be associated with a meter or transformer"),
            (Some(_), Some(_)) => {
                Some("A reading cannot be associated with both a meter and a transformer")
            }
            _ => None,
        }
    }
}

/// Bulk update entry; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReadingRequest {
    pub id: String,
    pub meter_id: Option<String>,
    pub transformer_id: Option<String>,
    pub reading_type: Option<String>,
    pub value: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub is_estimated: Option<bool>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_score: Option<f64>,
    #[validate(length(max = 200))]
    pub source_info: Option<String>,
}

/// Summary returned by the bulk insert endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkCreateSummary {
    pub message: String,
    pub total_created: usize,
    /// Inserted rows per reading type
    pub reading_types: HashMap<String, usize>,
    pub sources_affected: SourcesAffected,
    pub time_range: TimeRange,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SourcesAffected {
    /// Distinct meters referenced by the batch
    pub meters: usize,
    /// Distinct transformers referenced by the batch
    pub transformers: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeRange {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}
