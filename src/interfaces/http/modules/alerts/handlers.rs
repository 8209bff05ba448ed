//! Alert API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};

use super::dto::{
    parse_alert_status, AlertDto, AlertListQuery, CreateAlertRequest, UpdateAlertRequest,
};
use crate::infrastructure::database::entities::alert;
use crate::interfaces::http::common::{
    bad_request, internal_error, not_found, query_error, ApiResponse, ErrorResponse,
    PaginatedResponse, ValidatedJson,
};
use crate::query::{
    apply_filters, build_search_filters, paginate, parse_filters, Combine, Filter, PageParams,
};

/// Alert handler state
#[derive(Clone)]
pub struct AlertHandlerState {
    pub db: DatabaseConnection,
    pub max_page_size: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/alerts/{alert_id}",
    tag = "Alerts",
    security(("bearer_auth" = [])),
    params(("alert_id" = String, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert", body = ApiResponse<AlertDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_alert(
    State(state): State<AlertHandlerState>,
    Path(alert_id): Path<String>,
) -> Result<Json<ApiResponse<AlertDto>>, ErrorResponse<AlertDto>> {
    let model = alert::Entity::find_by_id(&alert_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    match model {
        Some(a) => Ok(Json(ApiResponse::success(AlertDto::from(a)))),
        None => Err(not_found("Alert not found")),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    tag = "Alerts",
    security(("bearer_auth" = [])),
    params(PageParams, AlertListQuery),
    responses(
        (status = 200, description = "Alert list", body = PaginatedResponse<AlertDto>),
        (status = 400, description = "Bad page or sort parameters")
    )
)]
/// List alerts with flexible filtering.
///
/// Examples: `?status=info`, `?status__in=info,warning`,
/// `?title__like=Feeder%`, `?created_at__gte=2024-01-01`.
/// Expired alerts are excluded unless `?exclude_expired=false`.
pub async fn list_alerts(
    State(state): State<AlertHandlerState>,
    Query(page_params): Query<PageParams>,
    Query(list_query): Query<AlertListQuery>,
    Query(raw_params): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedResponse<AlertDto>>, ErrorResponse<()>> {
    page_params
        .validate(state.max_page_size)
        .map_err(|e| bad_request(e.to_string()))?;

    let mut filters = parse_filters(&raw_params, alert::ALLOWED_FIELDS);
    if list_query.exclude_expired {
        filters.push(Filter::ne("status", "expired"));
    }

    let mut query = apply_filters(
        alert::Entity::find(),
        &filters,
        alert::QUERYABLE,
        Combine::And,
    )
    .map_err(query_error)?;

    if let Some(term) = list_query.search.as_deref() {
        let search_filters = build_search_filters(term, alert::SEARCH_FIELDS);
        query = apply_filters(query, &search_filters, alert::QUERYABLE, Combine::Or)
            .map_err(query_error)?;
    }

    let page = paginate(&state.db, query, alert::QUERYABLE, &page_params)
        .await
        .map_err(query_error)?;

    Ok(Json(page.map(AlertDto::from)))
}

#[utoipa::path(
    post,
    path = "/api/v1/alerts",
    tag = "Alerts",
    security(("bearer_auth" = [])),
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created", body = ApiResponse<AlertDto>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn create_alert(
    State(state): State<AlertHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateAlertRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AlertDto>>), ErrorResponse<AlertDto>> {
    let Some(status) = parse_alert_status(&request.status) else {
        return Err(bad_request(format!(
            "Unknown alert status: {}",
            request.status
        )));
    };

    let now = Utc::now();
    let created = alert::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        title: Set(request.title),
        message: Set(request.message),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(internal_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AlertDto::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/alerts/{alert_id}",
    tag = "Alerts",
    security(("bearer_auth" = [])),
    params(("alert_id" = String, Path, description = "Alert ID")),
    request_body = UpdateAlertRequest,
    responses(
        (status = 200, description = "Alert updated", body = ApiResponse<AlertDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_alert(
    State(state): State<AlertHandlerState>,
    Path(alert_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateAlertRequest>,
) -> Result<Json<ApiResponse<AlertDto>>, ErrorResponse<AlertDto>> {
    let model = alert::Entity::find_by_id(&alert_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(model) = model else {
        return Err(not_found("Alert not found"));
    };

    let mut active: alert::ActiveModel = model.into();
    if let Some(title) = request.title {
        active.title = Set(title);
    }
    if let Some(message) = request.message {
        active.message = Set(message);
    }
    if let Some(status_str) = &request.status {
        let Some(status) = parse_alert_status(status_str) else {
            return Err(bad_request(format!("Unknown alert status: {status_str}")));
        };
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(AlertDto::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/alerts/{alert_id}",
    tag = "Alerts",
    security(("bearer_auth" = [])),
    params(("alert_id" = String, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_alert(
    State(state): State<AlertHandlerState>,
    Path(alert_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ErrorResponse<()>> {
    let model = alert::Entity::find_by_id(&alert_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(model) = model else {
        return Err(not_found("Alert not found"));
    };

    model.delete(&state.db).await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(())))
}
