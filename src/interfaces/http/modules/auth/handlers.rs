//! Authentication API handlers
//!
//! Registration, login (token pair), refresh, logout via `jti`
//! blacklisting, and the admin-only user listing.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use super::dto::{
    str_to_role, AccessTokenDto, LoginRequest, RefreshRequest, RegisterRequest, UserDto,
    UserSearchQuery,
};
use crate::infrastructure::crypto::jwt::{
    create_access_token, create_token_pair, Claims, JwtConfig, TokenKind, TokenPair,
};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::database::entities::{token_blacklist, user};
use crate::interfaces::http::common::{
    bad_request, error_response, internal_error, query_error, ApiResponse, ErrorResponse,
    PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::{authenticate, AuthState, CurrentUser};
use crate::query::{
    apply_filters, build_search_filters, paginate, parse_filters, Combine, PageParams,
};

/// Auth handler state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub max_page_size: u64,
}

fn unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "User already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ErrorResponse<UserDto>> {
    let hashed_key = hash_password(&request.key).map_err(internal_error)?;

    let now = Utc::now();
    let new_user = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        email: Set(request.email),
        hashed_key: Set(hashed_key),
        first_name: Set(request.first_name),
        last_name: Set(request.last_name),
        other_names: Set(request.other_names),
        phone: Set(request.phone),
        role: Set(str_to_role(&request.role)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = new_user.insert(&state.db).await.map_err(|e| {
        if unique_violation(&e) {
            error_response(StatusCode::CONFLICT, "User already exists")
        } else {
            internal_error(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(created))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair", body = ApiResponse<TokenPair>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, ErrorResponse<TokenPair>> {
    let account = user::Entity::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(account) = account else {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials",
        ));
    };

    let key_valid = verify_password(&request.key, &account.hashed_key).unwrap_or(false);
    if !key_valid {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials",
        ));
    }

    let pair = create_token_pair(&account.id, &state.jwt_config).map_err(internal_error)?;
    Ok(Json(ApiResponse::success(pair)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Fresh access token", body = ApiResponse<AccessTokenDto>),
        (status = 401, description = "Invalid or revoked refresh token")
    )
)]
pub async fn refresh_access_token(
    State(state): State<AuthHandlerState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AccessTokenDto>>, ErrorResponse<AccessTokenDto>> {
    let header_value = format!("Bearer {}", request.refresh_token);
    let auth_state = AuthState {
        jwt_config: state.jwt_config.clone(),
        db: state.db.clone(),
    };
    let current = authenticate(Some(&header_value), TokenKind::Refresh, &auth_state)
        .await
        .map_err(|_| {
            error_response(
                StatusCode::UNAUTHORIZED,
                "Could not validate refresh token",
            )
        })?;

    let issued = create_access_token(&current.user.id, &state.jwt_config).map_err(internal_error)?;

    Ok(Json(ApiResponse::success(AccessTokenDto {
        access_token: issued.token,
        token_type: "bearer".to_string(),
        expires_in: issued.expires_in,
    })))
}

/// Insert the token's `jti` into the blacklist, once.
async fn blacklist_token(
    db: &DatabaseConnection,
    claims: &Claims,
    token_type: token_blacklist::TokenType,
) -> Result<(), DbErr> {
    let existing = token_blacklist::Entity::find()
        .filter(token_blacklist::Column::Jti.eq(&claims.jti))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let now = Utc::now();
    token_blacklist::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        jti: Set(claims.jti.clone()),
        token_type: Set(token_type),
        user_id: Set(claims.sub.clone()),
        expires_at: Set(DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout-access",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Access token revoked"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout_access(
    State(state): State<AuthHandlerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<()>>, ErrorResponse<()>> {
    blacklist_token(
        &state.db,
        &current.claims,
        token_blacklist::TokenType::Access,
    )
    .await
    .map_err(internal_error)?;

    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout-refresh",
    tag = "Authentication",
    responses(
        (status = 200, description = "Refresh token revoked"),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn logout_refresh(
    State(state): State<AuthHandlerState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, ErrorResponse<()>> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let auth_state = AuthState {
        jwt_config: state.jwt_config.clone(),
        db: state.db.clone(),
    };

    let current = authenticate(auth_header, TokenKind::Refresh, &auth_state)
        .await
        .map_err(|_| {
            error_response(
                StatusCode::UNAUTHORIZED,
                "Could not validate refresh token",
            )
        })?;

    blacklist_token(
        &state.db,
        &current.claims,
        token_blacklist::TokenType::Refresh,
    )
    .await
    .map_err(internal_error)?;

    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn current_user(
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(UserDto::from(current.user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/users",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    params(PageParams, UserSearchQuery),
    responses(
        (status = 200, description = "User list", body = PaginatedResponse<UserDto>),
        (status = 400, description = "Bad page or sort parameters"),
        (status = 403, description = "Admin only")
    )
)]
/// List users with flexible filtering. Admin only.
///
/// Supports the shared query mini-language on the allow-listed fields:
/// `?email=john@example.com`, `?type__in=admin,user`,
/// `?created_at__between=2024-01-01,2024-12-31`, `?email__ilike=%john%`.
/// `?search=john` matches email, first or last name.
pub async fn list_users(
    State(state): State<AuthHandlerState>,
    Extension(current): Extension<CurrentUser>,
    Query(page_params): Query<PageParams>,
    Query(search): Query<UserSearchQuery>,
    Query(raw_params): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedResponse<UserDto>>, ErrorResponse<()>> {
    if !current.is_admin() {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "Only admin users can access this endpoint",
        ));
    }

    page_params
        .validate(state.max_page_size)
        .map_err(|e| bad_request(e.to_string()))?;

    let filters = parse_filters(&raw_params, user::ALLOWED_FIELDS);
    let mut query = apply_filters(
        user::Entity::find(),
        &filters,
        user::QUERYABLE,
        Combine::And,
    )
    .map_err(query_error)?;

    if let Some(term) = search.search.as_deref() {
        let search_filters = build_search_filters(term, user::SEARCH_FIELDS);
        query = apply_filters(query, &search_filters, user::QUERYABLE, Combine::Or)
            .map_err(query_error)?;
    }

    let page = paginate(&state.db, query, user::QUERYABLE, &page_params)
        .await
        .map_err(query_error)?;

    Ok(Json(page.map(UserDto::from)))
}
