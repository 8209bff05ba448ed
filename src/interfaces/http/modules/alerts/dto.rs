//! Alert DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::infrastructure::database::entities::alert::{self, AlertStatus};

pub fn alert_status_to_str(status: &AlertStatus) -> &'static str {
    match status {
        AlertStatus::Info => "info",
        AlertStatus::Warning => "warning",
        AlertStatus::Error => "error",
        AlertStatus::Critical => "critical",
        AlertStatus::Expired => "expired",
    }
}

pub fn parse_alert_status(s: &str) -> Option<AlertStatus> {
    match s.to_lowercase().as_str() {
        "info" => Some(AlertStatus::Info),
        "warning" => Some(AlertStatus::Warning),
        "error" => Some(AlertStatus::Error),
        "critical" => Some(AlertStatus::Critical),
        "expired" => Some(AlertStatus::Expired),
        _ => None,
    }
}

/// Alert API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlertDto {
    pub id: String,
    pub title: String,
    pub message: String,
    /// info, warning, error, critical or expired
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<alert::Model> for AlertDto {
    fn from(a: alert::Model) -> Self {
        Self {
            id: a.id,
            title: a.title,
            message: a.message,
            status: alert_status_to_str(&a.status).to_string(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Create alert request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAlertRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    /// info, warning, error, critical or expired
    pub status: String,
}

/// Update alert request; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAlertRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub message: Option<String>,
    pub status: Option<String>,
}

/// Alert list query parameters beyond pagination and filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct AlertListQuery {
    /// Search across title, message and status
    pub search: Option<String>,
    /// Exclude expired alerts (default: true)
    #[serde(default = "default_exclude_expired")]
    pub exclude_expired: bool,
}

fn default_exclude_expired() -> bool {
    true
}
