//! Reading API handlers
//!
//! Time-series ingest and retrieval: single and bulk insert, filtered
//! listing, and bulk update/delete keyed by reading ID.

use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use validator::Validate;

use super::dto::{
    parse_reading_type, BulkCreateSummary, CreateReadingRequest, ReadingDto, SourcesAffected,
    TimeRange, UpdateReadingRequest,
};
use crate::infrastructure::database::entities::reading;
use crate::interfaces::http::common::{
    bad_request, error_response, internal_error, not_found, query_error, ApiResponse,
    ErrorResponse, PaginatedResponse, ValidatedJson,
};
use crate::query::{apply_filters, paginate, parse_filters, Combine, PageParams};

/// Cap on rows per bulk request
const MAX_BULK_READINGS: usize = 500;

/// Reading handler state
#[derive(Clone)]
pub struct ReadingHandlerState {
    pub db: DatabaseConnection,
    pub max_page_size: u64,
}

fn build_model(
    request: &CreateReadingRequest,
) -> Result<reading::ActiveModel, ErrorResponse<ReadingDto>> {
    if let Some(msg) = request.source_error() {
        return Err(bad_request(msg));
    }
    let Some(reading_type) = parse_reading_type(&request.reading_type) else {
        return Err(bad_request(format!(
            "Unknown reading type: {}",
            request.reading_type
        )));
    };

    let now = Utc::now();
    Ok(reading::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        meter_id: Set(request.meter_id.clone()),
        transformer_id: Set(request.transformer_id.clone()),
        reading_type: Set(reading_type),
        value: Set(request.value),
        timestamp: Set(request.timestamp),
        is_estimated: Set(request.is_estimated),
        confidence_score: Set(request.confidence_score),
        source_info: Set(request.source_info.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/readings",
    tag = "Readings",
    security(("bearer_auth" = [])),
    request_body = CreateReadingRequest,
    responses(
        (status = 201, description = "Reading created", body = ApiResponse<ReadingDto>),
        (status = 400, description = "Invalid source or reading type")
    )
)]
pub async fn create_reading(
    State(state): State<ReadingHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateReadingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReadingDto>>), ErrorResponse<ReadingDto>> {
    let model = build_model(&request)?;
    let created = model.insert(&state.db).await.map_err(internal_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReadingDto::from(created))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/readings/bulk",
    tag = "Readings",
    security(("bearer_auth" = [])),
    request_body = Vec<CreateReadingRequest>,
    responses(
        (status = 201, description = "Batch inserted", body = ApiResponse<BulkCreateSummary>),
        (status = 400, description = "Empty batch, oversized batch or invalid row")
    )
)]
pub async fn bulk_create_readings(
    State(state): State<ReadingHandlerState>,
    Json(requests): Json<Vec<CreateReadingRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<BulkCreateSummary>>), ErrorResponse<BulkCreateSummary>> {
    if requests.is_empty() {
        return Err(bad_request("At least one reading is required"));
    }
    if requests.len() > MAX_BULK_READINGS {
        return Err(bad_request(format!(
            "Maximum {MAX_BULK_READINGS} readings allowed per bulk request"
        )));
    }

    let mut models = Vec::with_capacity(requests.len());
    for (index, request) in requests.iter().enumerate() {
        request
            .validate()
            .map_err(|e| bad_request(format!("Reading {index}: {e}")))?;
        let model = build_model(request).map_err(|(status, body)| {
            let message = body.0.error.unwrap_or_else(|| "Invalid reading".to_string());
            error_response(status, format!("Reading {index}: {message}"))
        })?;
        models.push(model);
    }

    reading::Entity::insert_many(models)
        .exec(&state.db)
        .await
        .map_err(internal_error)?;

    // Summary is computed from the accepted batch itself.
    let mut reading_types = std::collections::HashMap::new();
    let mut meters = HashSet::new();
    let mut transformers = HashSet::new();
    let mut earliest = requests[0].timestamp;
    let mut latest = requests[0].timestamp;

    for request in &requests {
        *reading_types
            .entry(request.reading_type.to_lowercase())
            .or_insert(0) += 1;
        if let Some(meter_id) = &request.meter_id {
            meters.insert(meter_id.clone());
        }
        if let Some(transformer_id) = &request.transformer_id {
            transformers.insert(transformer_id.clone());
        }
        earliest = earliest.min(request.timestamp);
        latest = latest.max(request.timestamp);
    }

    let summary = BulkCreateSummary {
        message: format!("Successfully created {} readings", requests.len()),
        total_created: requests.len(),
        reading_types,
        sources_affected: SourcesAffected {
            meters: meters.len(),
            transformers: transformers.len(),
        },
        time_range: TimeRange { earliest, latest },
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::success(summary))))
}

#[utoipa::path(
    get,
    path = "/api/v1/readings",
    tag = "Readings",
    security(("bearer_auth" = [])),
    params(PageParams),
    responses(
        (status = 200, description = "Reading list", body = PaginatedResponse<ReadingDto>),
        (status = 400, description = "Bad page or sort parameters")
    )
)]
/// List readings with flexible filtering.
///
/// Examples: `?reading_type=voltage`, `?meter_id=<uuid>`,
/// `?value__gte=100`, `?is_estimated=false`,
/// `?timestamp__between=2024-01-01T00:00:00Z,2024-01-02T00:00:00Z`,
/// `?reading_type__in=voltage,current`.
pub async fn list_readings(
    State(state): State<ReadingHandlerState>,
    Query(page_params): Query<PageParams>,
    Query(raw_params): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedResponse<ReadingDto>>, ErrorResponse<()>> {
    page_params
        .validate(state.max_page_size)
        .map_err(|e| bad_request(e.to_string()))?;

    let filters = parse_filters(&raw_params, reading::ALLOWED_FIELDS);
    let query = apply_filters(
        reading::Entity::find(),
        &filters,
        reading::QUERYABLE,
        Combine::And,
    )
    .map_err(query_error)?;

    let page = paginate(&state.db, query, reading::QUERYABLE, &page_params)
        .await
        .map_err(query_error)?;

    Ok(Json(page.map(ReadingDto::from)))
}

#[utoipa::path(
    put,
    path = "/api/v1/readings",
    tag = "Readings",
    security(("bearer_auth" = [])),
    request_body = Vec<UpdateReadingRequest>,
    responses(
        (status = 200, description = "Updated readings", body = ApiResponse<Vec<ReadingDto>>),
        (status = 400, description = "Oversized batch or invalid row"),
        (status = 404, description = "Some readings not found")
    )
)]
pub async fn update_readings(
    State(state): State<ReadingHandlerState>,
    Json(updates): Json<Vec<UpdateReadingRequest>>,
) -> Result<Json<ApiResponse<Vec<ReadingDto>>>, ErrorResponse<Vec<ReadingDto>>> {
    if updates.len() > MAX_BULK_READINGS {
        return Err(bad_request(format!(
            "Maximum {MAX_BULK_READINGS} readings allowed per bulk request"
        )));
    }
    for (index, update) in updates.iter().enumerate() {
        update
            .validate()
            .map_err(|e| bad_request(format!("Reading {index}: {e}")))?;
    }

    let ids: Vec<String> = updates.iter().map(|u| u.id.clone()).collect();
    let existing = reading::Entity::find()
        .filter(reading::Column::Id.is_in(ids.iter().cloned()))
        .all(&state.db)
        .await
        .map_err(internal_error)?;

    if existing.len() != updates.len() {
        let found: HashSet<&str> = existing.iter().map(|r| r.id.as_str()).collect();
        let missing: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !found.contains(id))
            .collect();
        return Err(not_found(format!(
            "Some readings not found: {}",
            missing.join(", ")
        )));
    }

    let txn = state.db.begin().await.map_err(internal_error)?;
    let mut updated = Vec::with_capacity(updates.len());

    for update in &updates {
        // Presence is guaranteed by the length check above.
        let Some(model) = existing.iter().find(|r| r.id == update.id).cloned() else {
            continue;
        };

        let mut active: reading::ActiveModel = model.into();
        if let Some(meter_id) = &update.meter_id {
            active.meter_id = Set(Some(meter_id.clone()));
        }
        if let Some(transformer_id) = &update.transformer_id {
            active.transformer_id = Set(Some(transformer_id.clone()));
        }
        if let Some(type_str) = &update.reading_type {
            let Some(reading_type) = parse_reading_type(type_str) else {
                return Err(bad_request(format!("Unknown reading type: {type_str}")));
            };
            active.reading_type = Set(reading_type);
        }
        if let Some(value) = update.value {
            active.value = Set(value);
        }
        if let Some(timestamp) = update.timestamp {
            active.timestamp = Set(timestamp);
        }
        if let Some(is_estimated) = update.is_estimated {
            active.is_estimated = Set(is_estimated);
        }
        if let Some(confidence_score) = update.confidence_score {
            active.confidence_score = Set(Some(confidence_score));
        }
        if let Some(source_info) = &update.source_info {
            active.source_info = Set(Some(source_info.clone()));
        }
        active.updated_at = Set(Utc::now());

        updated.push(active.update(&txn).await.map_err(internal_error)?);
    }

    txn.commit().await.map_err(internal_error)?;

    Ok(Json(ApiResponse::success(
        updated.into_iter().map(ReadingDto::from).collect(),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/readings",
    tag = "Readings",
    security(("bearer_auth" = [])),
    request_body = Vec<String>,
    responses(
        (status = 204, description = "Readings deleted")
    )
)]
pub async fn delete_readings(
    State(state): State<ReadingHandlerState>,
    Json(reading_ids): Json<Vec<String>>,
) -> Result<StatusCode, ErrorResponse<()>> {
    if reading_ids.is_empty() {
        return Ok(StatusCode::NO_CONTENT);
    }

    reading::Entity::delete_many()
        .filter(reading::Column::Id.is_in(reading_ids))
        .exec(&state.db)
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}
