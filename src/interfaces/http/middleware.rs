//! Authentication middleware for Axum
//!
//! Verifies the bearer access token, rejects revoked `jti`s against the
//! blacklist table, loads the account and attaches a [`CurrentUser`]
//! extension for handlers.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;

use crate::infrastructure::crypto::jwt::{verify_token, Claims, JwtConfig, TokenKind};
use crate::infrastructure::database::entities::{token_blacklist, user};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    WrongTokenKind,
    RevokedToken,
    UserNotFound,
    Internal(String),
}

/// Authentication state shared by the middleware and the auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub db: DatabaseConnection,
}

/// The authenticated account together with its token claims
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: user::Model,
    pub claims: Claims,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.user.role == user::UserRole::Admin
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header value.
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Check whether a token's `jti` has been revoked.
pub async fn ensure_not_revoked(db: &DatabaseConnection, jti: &str) -> Result<(), AuthError> {
    let revoked = token_blacklist::Entity::find()
        .filter(token_blacklist::Column::Jti.eq(jti))
        .one(db)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    if revoked.is_some() {
        return Err(AuthError::RevokedToken);
    }
    Ok(())
}

/// Verify a bearer header as `kind`, including the blacklist check, and
/// load the matching account.
pub async fn authenticate(
    auth_header: Option<&str>,
    kind: TokenKind,
    state: &AuthState,
) -> Result<CurrentUser, AuthError> {
    let Some(auth_header) = auth_header else {
        return Err(AuthError::MissingToken);
    };
    let Some(token) = extract_bearer(auth_header) else {
        return Err(AuthError::InvalidToken);
    };

    let claims = verify_token(token, kind, &state.jwt_config).map_err(|e| match e {
        crate::infrastructure::crypto::jwt::TokenError::WrongKind { .. } => {
            AuthError::WrongTokenKind
        }
        _ => AuthError::InvalidToken,
    })?;

    if claims.is_expired() {
        return Err(AuthError::ExpiredToken);
    }

    ensure_not_revoked(&state.db, &claims.jti).await?;

    let account = user::Entity::find_by_id(&claims.sub)
        .one(&state.db)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::UserNotFound)?;

    Ok(CurrentUser {
        user: account,
        claims,
    })
}

/// Access-token authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    match authenticate(auth_header.as_deref(), TokenKind::Access, &auth_state).await {
        Ok(current) => {
            request.extensions_mut().insert(current);
            next.run(request).await
        }
        Err(error) => auth_error_response(error),
    }
}

pub fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::WrongTokenKind => (StatusCode::UNAUTHORIZED, "Invalid token type"),
        AuthError::RevokedToken => (StatusCode::UNAUTHORIZED, "Token has been revoked"),
        AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "User not found"),
        AuthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed"),
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}
