//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::infrastructure::crypto::jwt::TokenPair;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{alerts, auth, grid, health, readings};

use alerts::dto::{AlertDto, CreateAlertRequest, UpdateAlertRequest};
use auth::dto::{AccessTokenDto, LoginRequest, RefreshRequest, RegisterRequest, UserDto};
use grid::dto::{
    CoverageAreaDto, CoverageAreaWithSubAreasDto, CreateCoverageAreaRequest, CreateMeterRequest,
    CreateTransformerRequest, MeterDto, TransformerDto, UpdateCoverageAreaRequest,
    UpdateMeterRequest, UpdateTransformerRequest,
};
use readings::dto::{
    BulkCreateSummary, CreateReadingRequest, ReadingDto, SourcesAffected, TimeRange,
    UpdateReadingRequest,
};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::refresh_access_token,
        auth::handlers::logout_access,
        auth::handlers::logout_refresh,
        auth::handlers::current_user,
        auth::handlers::list_users,
        // Coverage Areas
        grid::handlers::get_coverage_area,
        grid::handlers::get_coverage_area_with_sub_areas,
        grid::handlers::create_coverage_area,
        grid::handlers::update_coverage_area,
        grid::handlers::delete_coverage_area,
        grid::handlers::list_coverage_areas,
        // Transformers
        grid::handlers::get_transformer,
        grid::handlers::create_transformer,
        grid::handlers::update_transformer,
        grid::handlers::delete_transformer,
        grid::handlers::list_transformers,
        // Meters
        grid::handlers::get_meter,
        grid::handlers::create_meter,
        grid::handlers::update_meter,
        grid::handlers::delete_meter,
        grid::handlers::list_meters,
        // Readings
        readings::handlers::create_reading,
        readings::handlers::bulk_create_readings,
        readings::handlers::list_readings,
        readings::handlers::update_readings,
        readings::handlers::delete_readings,
        // Alerts
        alerts::handlers::get_alert,
        alerts::handlers::list_alerts,
        alerts::handlers::create_alert,
        alerts::handlers::update_alert,
        alerts::handlers::delete_alert,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<UserDto>,
            PaginatedResponse<CoverageAreaDto>,
            PaginatedResponse<TransformerDto>,
            PaginatedResponse<MeterDto>,
            PaginatedResponse<ReadingDto>,
            PaginatedResponse<AlertDto>,
            // Auth
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            AccessTokenDto,
            TokenPair,
            UserDto,
            // Grid
            CoverageAreaDto,
            CoverageAreaWithSubAreasDto,
            CreateCoverageAreaRequest,
            UpdateCoverageAreaRequest,
            TransformerDto,
            CreateTransformerRequest,
            UpdateTransformerRequest,
            MeterDto,
            CreateMeterRequest,
            UpdateMeterRequest,
            // Readings
            ReadingDto,
            CreateReadingRequest,
            UpdateReadingRequest,
            BulkCreateSummary,
            SourcesAffected,
            TimeRange,
            // Alerts
            AlertDto,
            CreateAlertRequest,
            UpdateAlertRequest,
            // Health
            health::handlers::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User registration, JWT token pair issuance, refresh and revocation"),
        (name = "Coverage Areas", description = "Hierarchical coverage area management"),
        (name = "Transformers", description = "Transformer CRUD operations"),
        (name = "Meters", description = "Meter CRUD operations"),
        (name = "Readings", description = "Time-series measurement ingest and retrieval"),
        (name = "Alerts", description = "Operational alert management"),
    ),
    info(
        title = "Enerlytics API",
        version = "0.1.0",
        description = "Electricity distribution analysis API",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(db: DatabaseConnection, config: &AppConfig) -> Router {
    let jwt_config = config.security.jwt_config();
    let max_page_size = config.pagination.max_page_size;

    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
        db: db.clone(),
    };

    // Auth routes (public)
    let auth_state = auth::AuthHandlerState {
        db: db.clone(),
        jwt_config,
        max_page_size,
    };
    let auth_routes = Router::new()
        .route("/register", post(auth::handlers::register))
        .route("/login", post(auth::handlers::login))
        .route("/refresh", post(auth::handlers::refresh_access_token))
        // Takes the refresh token from the Authorization header itself,
        // so it stays off the access-token middleware.
        .route("/logout-refresh", post(auth::handlers::logout_refresh))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::handlers::current_user))
        .route("/users", get(auth::handlers::list_users))
        .route("/logout-access", post(auth::handlers::logout_access))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Grid routes (protected)
    let grid_state = grid::GridHandlerState {
        db: db.clone(),
        max_page_size,
    };
    let grid_routes = Router::new()
        .route("/coverage-area", post(grid::handlers::create_coverage_area))
        .route(
            "/coverage-area/{id}",
            get(grid::handlers::get_coverage_area)
                .put(grid::handlers::update_coverage_area)
                .delete(grid::handlers::delete_coverage_area),
        )
        .route(
            "/coverage-area/{id}/with-sub-areas",
            get(grid::handlers::get_coverage_area_with_sub_areas),
        )
        .route("/coverage-areas", get(grid::handlers::list_coverage_areas))
        .route(
            "/transformers",
            get(grid::handlers::list_transformers).post(grid::handlers::create_transformer),
        )
        .route(
            "/transformer/{id}",
            get(grid::handlers::get_transformer)
                .put(grid::handlers::update_transformer)
                .delete(grid::handlers::delete_transformer),
        )
        .route("/meter", post(grid::handlers::create_meter))
        .route(
            "/meter/{id}",
            get(grid::handlers::get_meter)
                .put(grid::handlers::update_meter)
                .delete(grid::handlers::delete_meter),
        )
        .route("/meters", get(grid::handlers::list_meters))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(grid_state);

    // Reading routes (protected)
    let reading_state = readings::ReadingHandlerState {
        db: db.clone(),
        max_page_size,
    };
    let reading_routes = Router::new()
        .route(
            "/",
            post(readings::handlers::create_reading)
                .get(readings::handlers::list_readings)
                .put(readings::handlers::update_readings)
                .delete(readings::handlers::delete_readings),
        )
        .route("/bulk", post(readings::handlers::bulk_create_readings))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(reading_state);

    // Alert routes (protected)
    let alert_state = alerts::AlertHandlerState {
        db,
        max_page_size,
    };
    let alert_routes = Router::new()
        .route(
            "/",
            get(alerts::handlers::list_alerts).post(alerts::handlers::create_alert),
        )
        .route(
            "/{alert_id}",
            get(alerts::handlers::get_alert)
                .put(alerts::handlers::update_alert)
                .delete(alerts::handlers::delete_alert),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(alert_state);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/", get(health::handlers::root))
        .route("/health", get(health::handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        .nest("/api/v1", grid_routes)
        .nest("/api/v1/readings", reading_routes)
        .nest("/api/v1/alerts", alert_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
