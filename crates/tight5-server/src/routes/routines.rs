//! Routine Routes - Set lists and running-order editing
//!
//! HTTP handlers that delegate to RoutineService for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use super::{error_response, ApiError};
use crate::auth::Owner;
use crate::models::{
    CreateRoutineRequest, InsertJokeRequest, MoveJokeRequest, RoutineResponse,
    UpdateRoutineRequest,
};
use crate::AppState;

/// List routines
#[utoipa::path(
    get,
    path = "/api/routines",
    responses(
        (status = 200, description = "Routines, newest first", body = Vec<RoutineResponse>)
    ),
    tag = "Routines"
)]
pub async fn list_routines(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
) -> Result<Json<Vec<RoutineResponse>>, ApiError> {
    let routines = state
        .routine_service
        .list(owner.as_str())
        .await
        .map_err(error_response)?;

    Ok(Json(routines.into_iter().map(RoutineResponse::from).collect()))
}

/// Create new routine
#[utoipa::path(
    post,
    path = "/api/routines",
    request_body = CreateRoutineRequest,
    responses(
        (status = 201, description = "Routine created", body = RoutineResponse),
        (status = 400, description = "Invalid routine or unknown joke id")
    ),
    tag = "Routines"
)]
pub async fn create_routine(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Json(payload): Json<CreateRoutineRequest>,
) -> Result<(StatusCode, Json<RoutineResponse>), ApiError> {
    let routine = state
        .routine_service
        .create(owner.as_str(), payload.into())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(routine.into())))
}

/// Get routine by ID
#[utoipa::path(
    get,
    path = "/api/routines/{id}",
    params(("id" = Uuid, Path, description = "Routine ID")),
    responses(
        (status = 200, description = "Routine found", body = RoutineResponse),
        (status = 404, description = "Routine not found")
    ),
    tag = "Routines"
)]
pub async fn get_routine(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoutineResponse>, ApiError> {
    let routine = state
        .routine_service
        .get(owner.as_str(), id)
        .await
        .map_err(error_response)?;

    Ok(Json(routine.into()))
}

/// Update routine
#[utoipa::path(
    patch,
    path = "/api/routines/{id}",
    params(("id" = Uuid, Path, description = "Routine ID")),
    request_body = UpdateRoutineRequest,
    responses(
        (status = 200, description = "Routine updated", body = RoutineResponse),
        (status = 400, description = "Invalid changes"),
        (status = 404, description = "Routine not found")
    ),
    tag = "Routines"
)]
pub async fn update_routine(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoutineRequest>,
) -> Result<Json<RoutineResponse>, ApiError> {
    let routine = state
        .routine_service
        .update(owner.as_str(), id, payload.into())
        .await
        .map_err(error_response)?;

    Ok(Json(routine.into()))
}

/// Delete routine and the performances recorded against it
#[utoipa::path(
    delete,
    path = "/api/routines/{id}",
    params(("id" = Uuid, Path, description = "Routine ID")),
    responses(
        (status = 204, description = "Routine deleted"),
        (status = 404, description = "Routine not found")
    ),
    tag = "Routines"
)]
pub async fn delete_routine(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .routine_service
        .delete(owner.as_str(), id)
        .await
        .map_err(error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Insert a joke into the running order
#[utoipa::path(
    post,
    path = "/api/routines/{id}/jokes",
    params(("id" = Uuid, Path, description = "Routine ID")),
    request_body = InsertJokeRequest,
    responses(
        (status = 200, description = "Joke inserted", body = RoutineResponse),
        (status = 400, description = "Unknown joke id"),
        (status = 404, description = "Routine not found")
    ),
    tag = "Routines"
)]
pub async fn insert_joke(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InsertJokeRequest>,
) -> Result<Json<RoutineResponse>, ApiError> {
    let routine = state
        .routine_service
        .insert_joke(owner.as_str(), id, payload.joke_id, payload.position)
        .await
        .map_err(error_response)?;

    Ok(Json(routine.into()))
}

/// Remove every occurrence of a joke from the running order
#[utoipa::path(
    delete,
    path = "/api/routines/{id}/jokes/{joke_id}",
    params(
        ("id" = Uuid, Path, description = "Routine ID"),
        ("joke_id" = Uuid, Path, description = "Joke ID")
    ),
    responses(
        (status = 200, description = "Joke removed", body = RoutineResponse),
        (status = 404, description = "Routine not found or joke not in it")
    ),
    tag = "Routines"
)]
pub async fn remove_joke(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path((id, joke_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RoutineResponse>, ApiError> {
    let routine = state
        .routine_service
        .remove_joke(owner.as_str(), id, joke_id)
        .await
        .map_err(error_response)?;

    Ok(Json(routine.into()))
}

/// Move a joke within the running order
#[utoipa::path(
    post,
    path = "/api/routines/{id}/move",
    params(("id" = Uuid, Path, description = "Routine ID")),
    request_body = MoveJokeRequest,
    responses(
        (status = 200, description = "Joke moved", body = RoutineResponse),
        (status = 400, description = "Position out of range"),
        (status = 404, description = "Routine not found")
    ),
    tag = "Routines"
)]
pub async fn move_joke(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveJokeRequest>,
) -> Result<Json<RoutineResponse>, ApiError> {
    let routine = state
        .routine_service
        .move_joke(owner.as_str(), id, payload.from, payload.to)
        .await
        .map_err(error_response)?;

    Ok(Json(routine.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/routines", get(list_routines).post(create_routine))
        .route(
            "/api/routines/:id",
            get(get_routine)
                .patch(update_routine)
                .delete(delete_routine),
        )
        .route("/api/routines/:id/jokes", post(insert_joke))
        .route("/api/routines/:id/jokes/:joke_id", delete(remove_joke))
        .route("/api/routines/:id/move", post(move_joke))
}
