//! Authentication and user DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::infrastructure::database::entities::user::{self, UserRole};

pub fn role_to_str(role: &UserRole) -> &'static str {
    match role {
        UserRole::Admin => "admin",
        UserRole::User => "user",
    }
}

pub fn str_to_role(s: &str) -> UserRole {
    match s.to_lowercase().as_str() {
        "admin" => UserRole::Admin,
        _ => UserRole::User,
    }
}

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_names: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserDto {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            other_names: u.other_names,
            phone: u.phone,
            role: role_to_str(&u.role).to_string(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub other_names: Option<String>,
    pub phone: Option<String>,
    /// Account type (admin, user). Defaults to `user`.
    #[serde(rename = "type", default = "default_role")]
    pub role: String,
    /// Login key (password)
    #[validate(length(min = 8, message = "Key must be at least 8 characters"))]
    pub key: String,
}

fn default_role() -> String {
    "user".to_string()
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub key: String,
}

/// Access-token refresh request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// A fresh access token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenDto {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// List users query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserSearchQuery {
    /// Search across email, first_name and last_name
    pub search: Option<String>,
}
