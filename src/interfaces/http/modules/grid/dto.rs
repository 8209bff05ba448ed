//! Grid infrastructure DTOs (coverage areas, transformers, meters)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::infrastructure::database::entities::coverage_area::{self, CoverageAreaType};
use crate::infrastructure::database::entities::{meter, transformer};

pub fn area_type_to_str(t: &CoverageAreaType) -> &'static str {
    match t {
        CoverageAreaType::Country => "country",
        CoverageAreaType::Province => "province",
        CoverageAreaType::District => "district",
        CoverageAreaType::SubDistrict => "sub-district",
        CoverageAreaType::Village => "village",
    }
}

pub fn parse_area_type(s: &str) -> Option<CoverageAreaType> {
    match s.to_lowercase().as_str() {
        "country" => Some(CoverageAreaType::Country),
        "province" => Some(CoverageAreaType::Province),
        "district" => Some(CoverageAreaType::District),
        "sub-district" => Some(CoverageAreaType::SubDistrict),
        "village" => Some(CoverageAreaType::Village),
        _ => None,
    }
}

/// Coverage area API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CoverageAreaDto {
    pub id: String,
    /// Administrative level (country, province, district, sub-district, village)
    #[serde(rename = "type")]
    pub area_type: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Transformers directly inside this area
    pub num_transformers: u64,
    /// Meters hanging off those transformers
    pub num_meters: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CoverageAreaDto {
    pub fn from_model(model: coverage_area::Model, num_transformers: u64, num_meters: u64) -> Self {
        Self {
            id: model.id,
            area_type: area_type_to_str(&model.area_type).to_string(),
            name: model.name,
            description: model.description,
            parent_id: model.parent_id,
            num_transformers,
            num_meters,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Coverage area with its direct sub-areas
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CoverageAreaWithSubAreasDto {
    #[serde(flatten)]
    pub area: CoverageAreaDto,
    pub sub_areas: Vec<CoverageAreaDto>,
}

/// Create coverage area request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCoverageAreaRequest {
    /// Administrative level (country, province, district, sub-district, village)
    #[serde(rename = "type")]
    pub area_type: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub parent_id: Option<String>,
}

/// Update coverage area request; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCoverageAreaRequest {
    #[serde(rename = "type")]
    pub area_type: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

/// Transformer API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransformerDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub coverage_area_id: String,
    /// Meters attached to this transformer
    pub num_meters: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransformerDto {
    pub fn from_model(model: transformer::Model, num_meters: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            coverage_area_id: model.coverage_area_id,
            num_meters,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create transformer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTransformerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub coverage_area_id: String,
}

/// Update transformer request; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTransformerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub coverage_area_id: Option<String>,
}

/// Meter API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeterDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub transformer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<meter::Model> for MeterDto {
    fn from(m: meter::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            transformer_id: m.transformer_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Create meter request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMeterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub transformer_id: String,
}

/// Update meter request; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMeterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub transformer_id: Option<String>,
}

/// Free-text search parameter for grid list endpoints
#[derive(Debug, Deserialize, IntoParams)]
pub struct GridSearchQuery {
    /// Search across name and description (and type, for coverage areas)
    pub search: Option<String>,
}
