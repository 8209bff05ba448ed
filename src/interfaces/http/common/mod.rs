//! Shared HTTP response types and error helpers

mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use validated_json::ValidatedJson;

pub use crate::query::PaginatedResponse;
use crate::query::QueryError;

/// Standard API response wrapper
///
/// Success: `{"success": true, "data": {...}}`;
/// failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// The error half of every handler's return type.
pub type ErrorResponse<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn error_response<T>(status: StatusCode, message: impl Into<String>) -> ErrorResponse<T> {
    (status, Json(ApiResponse::error(message)))
}

/// Map an unexpected failure (database, hashing, token signing) to a 500.
pub fn internal_error<T>(err: impl std::fmt::Display) -> ErrorResponse<T> {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub fn not_found<T>(message: impl Into<String>) -> ErrorResponse<T> {
    error_response(StatusCode::NOT_FOUND, message)
}

pub fn bad_request<T>(message: impl Into<String>) -> ErrorResponse<T> {
    error_response(StatusCode::BAD_REQUEST, message)
}

/// Map a query-engine failure onto a status code. A bad `sort_by` is the
/// client's fault; everything else indicates a bug or a store failure.
pub fn query_error<T>(err: QueryError) -> ErrorResponse<T> {
    let status = match &err {
        QueryError::UnknownSortField(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}
