//! `/systems` resource handlers.

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use service::errors::ServiceError;
use service::system::System;
use tracing::{info, warn};

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(
    get, path = "/systems", tag = "system",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Get All Systems", body = [crate::openapi::SystemDoc]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_systems(State(state): State<ServerState>) -> Result<Json<Vec<System>>, JsonApiError> {
    let systems = state.systems.find_all().await?;
    info!(count = systems.len(), "list systems");
    Ok(Json(systems))
}

#[utoipa::path(
    get, path = "/systems/{system_id}", tag = "system",
    security(("bearer" = [])),
    params(("system_id" = i32, Path, description = "System identifier")),
    responses(
        (status = 200, description = "Get System by systemId", body = crate::openapi::SystemDoc),
        (status = 404, description = "System does not exist for systemId")
    )
)]
pub async fn get_system(
    State(state): State<ServerState>,
    Path(system_id): Path<i32>,
) -> Result<Response, JsonApiError> {
    match state.systems.find_by_id(system_id).await? {
        Some(system) => Ok(Json(system).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

#[utoipa::path(
    post, path = "/systems", tag = "system",
    security(("bearer" = [])),
    request_body = crate::openapi::SystemDoc,
    responses(
        (status = 201, description = "System Created", body = crate::openapi::SystemDoc,
            headers(("location" = String, description = "URI of the created system"))),
        (status = 400, description = "Invalid System")
    )
)]
pub async fn create_system(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<System>, JsonRejection>,
) -> Result<impl IntoResponse, JsonApiError> {
    let Json(mut system) = payload?;
    system.validate()?;
    state.systems.save(&mut system).await?;

    let system_id = system
        .system_id
        .ok_or_else(|| JsonApiError::internal("store did not assign a systemId"))?;
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), system_id);
    info!(system_id, location = %location, "created system");
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(system)))
}

#[utoipa::path(
    put, path = "/systems/{system_id}", tag = "system",
    security(("bearer" = [])),
    params(("system_id" = i32, Path, description = "System identifier")),
    request_body = crate::openapi::SystemDoc,
    responses(
        (status = 204, description = "System updated"),
        (status = 400, description = "Invalid System, missing systemId, or path/body systemId mismatch"),
        (status = 404, description = "No System found for systemId provided")
    )
)]
pub async fn update_system(
    State(state): State<ServerState>,
    Path(system_id): Path<i32>,
    payload: Result<Json<System>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Json(mut system) = payload?;
    system.validate()?;
    if system.system_id != Some(system_id) {
        warn!(path_id = system_id, body_id = ?system.system_id, "systemId mismatch");
        return Err(ServiceError::IdMismatch { path: system_id, body: system.system_id }.into());
    }
    state.systems.update(&mut system).await?;
    info!(system_id, "updated system");
    Ok(StatusCode::NO_CONTENT)
}
