//! Grid infrastructure handlers
//!
//! CRUD plus filtered listings for coverage areas, transformers and
//! meters. The derived `num_transformers` / `num_meters` counters are
//! batched per page instead of being loaded row by row.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter,
    Set,
};

use super::dto::{
    parse_area_type, CoverageAreaDto, CoverageAreaWithSubAreasDto, CreateCoverageAreaRequest,
    CreateMeterRequest, CreateTransformerRequest, GridSearchQuery, MeterDto, TransformerDto,
    UpdateCoverageAreaRequest, UpdateMeterRequest, UpdateTransformerRequest,
};
use crate::infrastructure::database::entities::{coverage_area, meter, transformer};
use crate::interfaces::http::common::{
    bad_request, internal_error, not_found, query_error, ApiResponse, ErrorResponse,
    PaginatedResponse, ValidatedJson,
};
use crate::query::{
    apply_filters, build_search_filters, paginate, parse_filters, Combine, PageParams,
};

/// Grid handler state
#[derive(Clone)]
pub struct GridHandlerState {
    pub db: DatabaseConnection,
    pub max_page_size: u64,
}

fn unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

/// (transformer count, meter count) per coverage area.
async fn area_counts(
    db: &DatabaseConnection,
    area_ids: &[String],
) -> Result<HashMap<String, (u64, u64)>, DbErr> {
    let mut counts: HashMap<String, (u64, u64)> = HashMap::new();
    if area_ids.is_empty() {
        return Ok(counts);
    }

    let transformers = transformer::Entity::find()
        .filter(transformer::Column::CoverageAreaId.is_in(area_ids.iter().cloned()))
        .all(db)
        .await?;

    let mut area_of_transformer: HashMap<String, String> = HashMap::new();
    for t in &transformers {
        counts.entry(t.coverage_area_id.clone()).or_default().0 += 1;
        area_of_transformer.insert(t.id.clone(), t.coverage_area_id.clone());
    }

    if !transformers.is_empty() {
        let meters = meter::Entity::find()
            .filter(meter::Column::TransformerId.is_in(transformers.iter().map(|t| t.id.clone())))
            .all(db)
            .await?;
        for m in &meters {
            if let Some(area_id) = area_of_transformer.get(&m.transformer_id) {
                counts.entry(area_id.clone()).or_default().1 += 1;
            }
        }
    }

    Ok(counts)
}

/// Meter count per transformer.
async fn meter_counts(
    db: &DatabaseConnection,
    transformer_ids: &[String],
) -> Result<HashMap<String, u64>, DbErr> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    if transformer_ids.is_empty() {
        return Ok(counts);
    }

    let meters = meter::Entity::find()
        .filter(meter::Column::TransformerId.is_in(transformer_ids.iter().cloned()))
        .all(db)
        .await?;
    for m in &meters {
        *counts.entry(m.transformer_id.clone()).or_default() += 1;
    }

    Ok(counts)
}

async fn area_to_dto(
    db: &DatabaseConnection,
    model: coverage_area::Model,
) -> Result<CoverageAreaDto, DbErr> {
    let counts = area_counts(db, std::slice::from_ref(&model.id)).await?;
    let (num_transformers, num_meters) = counts.get(&model.id).copied().unwrap_or((0, 0));
    Ok(CoverageAreaDto::from_model(
        model,
        num_transformers,
        num_meters,
    ))
}

// ── Coverage areas ─────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/coverage-area/{id}",
    tag = "Coverage Areas",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Coverage area ID")),
    responses(
        (status = 200, description = "Coverage area", body = ApiResponse<CoverageAreaDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_coverage_area(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CoverageAreaDto>>, ErrorResponse<CoverageAreaDto>> {
    let area = coverage_area::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(area) = area else {
        return Err(not_found("Coverage area not found"));
    };

    let dto = area_to_dto(&state.db, area).await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(dto)))
}

#[utoipa::path(
    get,
    path = "/api/v1/coverage-area/{id}/with-sub-areas",
    tag = "Coverage Areas",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Coverage area ID")),
    responses(
        (status = 200, description = "Coverage area with direct sub-areas", body = ApiResponse<CoverageAreaWithSubAreasDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_coverage_area_with_sub_areas(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CoverageAreaWithSubAreasDto>>, ErrorResponse<CoverageAreaWithSubAreasDto>>
{
    let area = coverage_area::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(area) = area else {
        return Err(not_found("Coverage area not found"));
    };

    let children = coverage_area::Entity::find()
        .filter(coverage_area::Column::ParentId.eq(&area.id))
        .all(&state.db)
        .await
        .map_err(internal_error)?;

    let mut ids: Vec<String> = children.iter().map(|c| c.id.clone()).collect();
    ids.push(area.id.clone());
    let counts = area_counts(&state.db, &ids).await.map_err(internal_error)?;
    let count_of = |id: &str| counts.get(id).copied().unwrap_or((0, 0));

    let (nt, nm) = count_of(&area.id);
    let sub_areas = children
        .into_iter()
        .map(|c| {
            let (ct, cm) = count_of(&c.id);
            CoverageAreaDto::from_model(c, ct, cm)
        })
        .collect();

    Ok(Json(ApiResponse::success(CoverageAreaWithSubAreasDto {
        area: CoverageAreaDto::from_model(area, nt, nm),
        sub_areas,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/coverage-area",
    tag = "Coverage Areas",
    security(("bearer_auth" = [])),
    request_body = CreateCoverageAreaRequest,
    responses(
        (status = 201, description = "Coverage area created", body = ApiResponse<CoverageAreaDto>),
        (status = 400, description = "Unknown type, missing parent or duplicate name")
    )
)]
pub async fn create_coverage_area(
    State(state): State<GridHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateCoverageAreaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CoverageAreaDto>>), ErrorResponse<CoverageAreaDto>> {
    let Some(area_type) = parse_area_type(&request.area_type) else {
        return Err(bad_request(format!(
            "Unknown coverage area type: {}",
            request.area_type
        )));
    };

    if let Some(parent_id) = &request.parent_id {
        let parent = coverage_area::Entity::find_by_id(parent_id)
            .one(&state.db)
            .await
            .map_err(internal_error)?;
        if parent.is_none() {
            return Err(bad_request("Parent coverage area not found"));
        }
    }

    let now = Utc::now();
    let created = coverage_area::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        area_type: Set(area_type),
        name: Set(request.name.clone()),
        description: Set(request.description),
        parent_id: Set(request.parent_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(|e| {
        if unique_violation(&e) {
            bad_request(format!(
                "Coverage area already exists with this name({}) and type({})",
                request.name, request.area_type
            ))
        } else {
            internal_error(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CoverageAreaDto::from_model(
            created, 0, 0,
        ))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/coverage-area/{id}",
    tag = "Coverage Areas",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Coverage area ID")),
    request_body = UpdateCoverageAreaRequest,
    responses(
        (status = 200, description = "Coverage area updated", body = ApiResponse<CoverageAreaDto>),
        (status = 400, description = "Invalid parent"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_coverage_area(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCoverageAreaRequest>,
) -> Result<Json<ApiResponse<CoverageAreaDto>>, ErrorResponse<CoverageAreaDto>> {
    let area = coverage_area::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(area) = area else {
        return Err(not_found("Coverage area not found"));
    };

    if let Some(parent_id) = &request.parent_id {
        if *parent_id == id {
            return Err(bad_request("Coverage area cannot be its own parent"));
        }
        let parent = coverage_area::Entity::find_by_id(parent_id)
            .one(&state.db)
            .await
            .map_err(internal_error)?;
        if parent.is_none() {
            return Err(bad_request("Parent coverage area not found"));
        }
    }

    let mut active: coverage_area::ActiveModel = area.into();
    if let Some(type_str) = &request.area_type {
        let Some(area_type) = parse_area_type(type_str) else {
            return Err(bad_request(format!(
                "Unknown coverage area type: {type_str}"
            )));
        };
        active.area_type = Set(area_type);
    }
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    if let Some(parent_id) = request.parent_id {
        active.parent_id = Set(Some(parent_id));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await.map_err(internal_error)?;
    let dto = area_to_dto(&state.db, updated)
        .await
        .map_err(internal_error)?;
    Ok(Json(ApiResponse::success(dto)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/coverage-area/{id}",
    tag = "Coverage Areas",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Coverage area ID")),
    responses(
        (status = 200, description = "Coverage area deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_coverage_area(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ErrorResponse<()>> {
    let area = coverage_area::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(area) = area else {
        return Err(not_found("Coverage area not found"));
    };

    area.delete(&state.db).await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    get,
    path = "/api/v1/coverage-areas",
    tag = "Coverage Areas",
    security(("bearer_auth" = [])),
    params(PageParams, GridSearchQuery),
    responses(
        (status = 200, description = "Coverage area list", body = PaginatedResponse<CoverageAreaDto>),
        (status = 400, description = "Bad page or sort parameters")
    )
)]
/// List coverage areas with flexible filtering.
///
/// Examples: `?type=country`, `?name__ilike=%tongo%`,
/// `?type__in=country,province`, `?parent_id=<uuid>`.
/// `?search=term` matches name, description and type.
pub async fn list_coverage_areas(
    State(state): State<GridHandlerState>,
    Query(page_params): Query<PageParams>,
    Query(search): Query<GridSearchQuery>,
    Query(raw_params): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedResponse<CoverageAreaDto>>, ErrorResponse<()>> {
    page_params
        .validate(state.max_page_size)
        .map_err(|e| bad_request(e.to_string()))?;

    let filters = parse_filters(&raw_params, coverage_area::ALLOWED_FIELDS);
    let mut query = apply_filters(
        coverage_area::Entity::find(),
        &filters,
        coverage_area::QUERYABLE,
        Combine::And,
    )
    .map_err(query_error)?;

    if let Some(term) = search.search.as_deref() {
        let search_filters = build_search_filters(term, coverage_area::SEARCH_FIELDS);
        query = apply_filters(query, &search_filters, coverage_area::QUERYABLE, Combine::Or)
            .map_err(query_error)?;
    }

    let page = paginate(&state.db, query, coverage_area::QUERYABLE, &page_params)
        .await
        .map_err(query_error)?;

    let ids: Vec<String> = page.items.iter().map(|a| a.id.clone()).collect();
    let counts = area_counts(&state.db, &ids).await.map_err(internal_error)?;

    Ok(Json(page.map(|area| {
        let (nt, nm) = counts.get(&area.id).copied().unwrap_or((0, 0));
        CoverageAreaDto::from_model(area, nt, nm)
    })))
}

// ── Transformers ───────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/transformer/{id}",
    tag = "Transformers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Transformer ID")),
    responses(
        (status = 200, description = "Transformer", body = ApiResponse<TransformerDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_transformer(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TransformerDto>>, ErrorResponse<TransformerDto>> {
    let model = transformer::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(model) = model else {
        return Err(not_found("Transformer not found"));
    };

    let counts = meter_counts(&state.db, std::slice::from_ref(&model.id))
        .await
        .map_err(internal_error)?;
    let num_meters = counts.get(&model.id).copied().unwrap_or(0);

    Ok(Json(ApiResponse::success(TransformerDto::from_model(
        model, num_meters,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/transformers",
    tag = "Transformers",
    security(("bearer_auth" = [])),
    request_body = CreateTransformerRequest,
    responses(
        (status = 201, description = "Transformer created", body = ApiResponse<TransformerDto>),
        (status = 400, description = "Missing coverage area or duplicate name")
    )
)]
pub async fn create_transformer(
    State(state): State<GridHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateTransformerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransformerDto>>), ErrorResponse<TransformerDto>> {
    let area = coverage_area::Entity::find_by_id(&request.coverage_area_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;
    if area.is_none() {
        return Err(bad_request("Coverage area not found"));
    }

    let now = Utc::now();
    let created = transformer::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(request.name.clone()),
        description: Set(request.description),
        coverage_area_id: Set(request.coverage_area_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(|e| {
        if unique_violation(&e) {
            bad_request(format!(
                "Transformer with name ({}) already exists",
                request.name
            ))
        } else {
            internal_error(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TransformerDto::from_model(created, 0))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/transformer/{id}",
    tag = "Transformers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Transformer ID")),
    request_body = UpdateTransformerRequest,
    responses(
        (status = 200, description = "Transformer updated", body = ApiResponse<TransformerDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_transformer(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTransformerRequest>,
) -> Result<Json<ApiResponse<TransformerDto>>, ErrorResponse<TransformerDto>> {
    let model = transformer::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(model) = model else {
        return Err(not_found("Transformer not found"));
    };

    if let Some(area_id) = &request.coverage_area_id {
        let area = coverage_area::Entity::find_by_id(area_id)
            .one(&state.db)
            .await
            .map_err(internal_error)?;
        if area.is_none() {
            return Err(bad_request("Coverage area not found"));
        }
    }

    let mut active: transformer::ActiveModel = model.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    if let Some(area_id) = request.coverage_area_id {
        active.coverage_area_id = Set(area_id);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await.map_err(internal_error)?;
    let counts = meter_counts(&state.db, std::slice::from_ref(&updated.id))
        .await
        .map_err(internal_error)?;
    let num_meters = counts.get(&updated.id).copied().unwrap_or(0);

    Ok(Json(ApiResponse::success(TransformerDto::from_model(
        updated, num_meters,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/transformer/{id}",
    tag = "Transformers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Transformer ID")),
    responses(
        (status = 200, description = "Transformer deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_transformer(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ErrorResponse<()>> {
    let model = transformer::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(model) = model else {
        return Err(not_found("Transformer not found"));
    };

    model.delete(&state.db).await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    get,
    path = "/api/v1/transformers",
    tag = "Transformers",
    security(("bearer_auth" = [])),
    params(PageParams, GridSearchQuery),
    responses(
        (status = 200, description = "Transformer list", body = PaginatedResponse<TransformerDto>),
        (status = 400, description = "Bad page or sort parameters")
    )
)]
pub async fn list_transformers(
    State(state): State<GridHandlerState>,
    Query(page_params): Query<PageParams>,
    Query(search): Query<GridSearchQuery>,
    Query(raw_params): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedResponse<TransformerDto>>, ErrorResponse<()>> {
    page_params
        .validate(state.max_page_size)
        .map_err(|e| bad_request(e.to_string()))?;

    let filters = parse_filters(&raw_params, transformer::ALLOWED_FIELDS);
    let mut query = apply_filters(
        transformer::Entity::find(),
        &filters,
        transformer::QUERYABLE,
        Combine::And,
    )
    .map_err(query_error)?;

    if let Some(term) = search.search.as_deref() {
        let search_filters = build_search_filters(term, transformer::SEARCH_FIELDS);
        query = apply_filters(query, &search_filters, transformer::QUERYABLE, Combine::Or)
            .map_err(query_error)?;
    }

    let page = paginate(&state.db, query, transformer::QUERYABLE, &page_params)
        .await
        .map_err(query_error)?;

    let ids: Vec<String> = page.items.iter().map(|t| t.id.clone()).collect();
    let counts = meter_counts(&state.db, &ids).await.map_err(internal_error)?;

    Ok(Json(page.map(|t| {
        let num_meters = counts.get(&t.id).copied().unwrap_or(0);
        TransformerDto::from_model(t, num_meters)
    })))
}

// ── Meters ─────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/meter/{id}",
    tag = "Meters",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Meter ID")),
    responses(
        (status = 200, description = "Meter", body = ApiResponse<MeterDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_meter(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MeterDto>>, ErrorResponse<MeterDto>> {
    let model = meter::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    match model {
        Some(m) => Ok(Json(ApiResponse::success(MeterDto::from(m)))),
        None => Err(not_found("Meter not found")),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/meter",
    tag = "Meters",
    security(("bearer_auth" = [])),
    request_body = CreateMeterRequest,
    responses(
        (status = 201, description = "Meter created", body = ApiResponse<MeterDto>),
        (status = 400, description = "Missing transformer or duplicate name")
    )
)]
pub async fn create_meter(
    State(state): State<GridHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateMeterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MeterDto>>), ErrorResponse<MeterDto>> {
    let parent = transformer::Entity::find_by_id(&request.transformer_id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;
    if parent.is_none() {
        return Err(bad_request("Transformer not found"));
    }

    let now = Utc::now();
    let created = meter::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(request.name.clone()),
        description: Set(request.description),
        transformer_id: Set(request.transformer_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(|e| {
        if unique_violation(&e) {
            bad_request(format!("Meter with name ({}) already exists", request.name))
        } else {
            internal_error(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MeterDto::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/meter/{id}",
    tag = "Meters",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Meter ID")),
    request_body = UpdateMeterRequest,
    responses(
        (status = 200, description = "Meter updated", body = ApiResponse<MeterDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_meter(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateMeterRequest>,
) -> Result<Json<ApiResponse<MeterDto>>, ErrorResponse<MeterDto>> {
    let model = meter::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(model) = model else {
        return Err(not_found("Meter not found"));
    };

    if let Some(transformer_id) = &request.transformer_id {
        let parent = transformer::Entity::find_by_id(transformer_id)
            .one(&state.db)
            .await
            .map_err(internal_error)?;
        if parent.is_none() {
            return Err(bad_request("Transformer not found"));
        }
    }

    let mut active: meter::ActiveModel = model.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    if let Some(transformer_id) = request.transformer_id {
        active.transformer_id = Set(transformer_id);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(MeterDto::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/meter/{id}",
    tag = "Meters",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Meter ID")),
    responses(
        (status = 200, description = "Meter deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_meter(
    State(state): State<GridHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ErrorResponse<()>> {
    let model = meter::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(internal_error)?;

    let Some(model) = model else {
        return Err(not_found("Meter not found"));
    };

    model.delete(&state.db).await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    get,
    path = "/api/v1/meters",
    tag = "Meters",
    security(("bearer_auth" = [])),
    params(PageParams, GridSearchQuery),
    responses(
        (status = 200, description = "Meter list", body = PaginatedResponse<MeterDto>),
        (status = 400, description = "Bad page or sort parameters")
    )
)]
pub async fn list_meters(
    State(state): State<GridHandlerState>,
    Query(page_params): Query<PageParams>,
    Query(search): Query<GridSearchQuery>,
    Query(raw_params): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedResponse<MeterDto>>, ErrorResponse<()>> {
    page_params
        .validate(state.max_page_size)
        .map_err(|e| bad_request(e.to_string()))?;

    let filters = parse_filters(&raw_params, meter::ALLOWED_FIELDS);
    let mut query = apply_filters(
        meter::Entity::find(),
        &filters,
        meter::QUERYABLE,
        Combine::And,
    )
    .map_err(query_error)?;

    if let Some(term) = search.search.as_deref() {
        let search_filters = build_search_filters(term, meter::SEARCH_FIELDS);
        query = apply_filters(query, &search_filters, meter::QUERYABLE, Combine::Or)
            .map_err(query_error)?;
    }

    let page = paginate(&state.db, query, meter::QUERYABLE, &page_params)
        .await
        .map_err(query_error)?;

    Ok(Json(page.map(MeterDto::from)))
}
