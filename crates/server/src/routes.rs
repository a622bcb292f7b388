pub mod systems;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::security;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// `/systems` routes. Every route authenticates first, then checks its own capability.
pub fn system_routes(state: &ServerState) -> Router<ServerState> {
    let view = middleware::from_fn_with_state(state.clone(), security::require_system_view);
    let edit = middleware::from_fn_with_state(state.clone(), security::require_system_edit);

    Router::new()
        .route("/systems", get(systems::list_systems).route_layer(view.clone()))
        .route("/systems", post(systems::create_system).route_layer(edit.clone()))
        .route("/systems/:system_id", get(systems::get_system).route_layer(view))
        .route("/systems/:system_id", put(systems::update_system).route_layer(edit))
        .route_layer(middleware::from_fn_with_state(state.clone(), security::authenticate))
}

/// Build the full application router: health, API docs and the protected system resource.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (health + docs)
    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public
        .merge(system_routes(&state))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
