//! Joke Routes - Joke library, versions and performance log
//!
//! HTTP handlers that delegate to JokeService for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use tight5::Performance;

use super::{error_response, ApiError};
use crate::auth::Owner;
use crate::models::{
    CreateJokeRequest, CreatePerformanceRequest, JokeListQuery, JokeResponse, UpdateJokeRequest,
};
use crate::AppState;

/// List jokes, filtered and sorted
#[utoipa::path(
    get,
    path = "/api/jokes",
    params(JokeListQuery),
    responses(
        (status = 200, description = "Matching jokes", body = Vec<JokeResponse>),
        (status = 400, description = "Unknown filter or sort value")
    ),
    tag = "Jokes"
)]
pub async fn list_jokes(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Query(query): Query<JokeListQuery>,
) -> Result<Json<Vec<JokeResponse>>, ApiError> {
    let filters = query
        .filters()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let sort = query.sort().map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let jokes = state
        .joke_service
        .list(owner.as_str(), &filters, sort)
        .await
        .map_err(error_response)?;

    Ok(Json(jokes.into_iter().map(JokeResponse::from).collect()))
}

/// Create new joke
#[utoipa::path(
    post,
    path = "/api/jokes",
    request_body = CreateJokeRequest,
    responses(
        (status = 201, description = "Joke created", body = JokeResponse),
        (status = 400, description = "Invalid joke")
    ),
    tag = "Jokes"
)]
pub async fn create_joke(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Json(payload): Json<CreateJokeRequest>,
) -> Result<(StatusCode, Json<JokeResponse>), ApiError> {
    let joke = state
        .joke_service
        .create(owner.as_str(), payload.into())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(joke.into())))
}

/// Get joke by ID
#[utoipa::path(
    get,
    path = "/api/jokes/{id}",
    params(("id" = Uuid, Path, description = "Joke ID")),
    responses(
        (status = 200, description = "Joke found", body = JokeResponse),
        (status = 403, description = "Joke belongs to someone else"),
        (status = 404, description = "Joke not found")
    ),
    tag = "Jokes"
)]
pub async fn get_joke(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<JokeResponse>, ApiError> {
    let joke = state
        .joke_service
        .get(owner.as_str(), id)
        .await
        .map_err(error_response)?;

    Ok(Json(joke.into()))
}

/// Update joke; changing setup or punchline stores the previous text as a version
#[utoipa::path(
    patch,
    path = "/api/jokes/{id}",
    params(("id" = Uuid, Path, description = "Joke ID")),
    request_body = UpdateJokeRequest,
    responses(
        (status = 200, description = "Joke updated", body = JokeResponse),
        (status = 400, description = "Invalid changes"),
        (status = 404, description = "Joke not found")
    ),
    tag = "Jokes"
)]
pub async fn update_joke(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJokeRequest>,
) -> Result<Json<JokeResponse>, ApiError> {
    let joke = state
        .joke_service
        .update(owner.as_str(), id, payload.into())
        .await
        .map_err(error_response)?;

    Ok(Json(joke.into()))
}

/// Delete joke, removing it from every routine
#[utoipa::path(
    delete,
    path = "/api/jokes/{id}",
    params(("id" = Uuid, Path, description = "Joke ID")),
    responses(
        (status = 204, description = "Joke deleted"),
        (status = 404, description = "Joke not found")
    ),
    tag = "Jokes"
)]
pub async fn delete_joke(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .joke_service
        .delete(owner.as_str(), id)
        .await
        .map_err(error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Restore the text of a stored version
#[utoipa::path(
    post,
    path = "/api/jokes/{id}/versions/{version_id}/restore",
    params(
        ("id" = Uuid, Path, description = "Joke ID"),
        ("version_id" = Uuid, Path, description = "Version ID")
    ),
    responses(
        (status = 200, description = "Version restored", body = JokeResponse),
        (status = 404, description = "Joke or version not found")
    ),
    tag = "Jokes"
)]
pub async fn restore_version(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path((id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<JokeResponse>, ApiError> {
    let joke = state
        .joke_service
        .restore_version(owner.as_str(), id, version_id)
        .await
        .map_err(error_response)?;

    Ok(Json(joke.into()))
}

/// Performance history of a joke, newest first
#[utoipa::path(
    get,
    path = "/api/jokes/{id}/performances",
    params(("id" = Uuid, Path, description = "Joke ID")),
    responses(
        (status = 200, description = "Performances", body = Vec<Performance>),
        (status = 404, description = "Joke not found")
    ),
    tag = "Performances"
)]
pub async fn list_performances(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Performance>>, ApiError> {
    let performances = state
        .joke_service
        .performances(owner.as_str(), id)
        .await
        .map_err(error_response)?;

    Ok(Json(performances))
}

/// Record a performance of a joke
#[utoipa::path(
    post,
    path = "/api/jokes/{id}/performances",
    params(("id" = Uuid, Path, description = "Joke ID")),
    request_body = CreatePerformanceRequest,
    responses(
        (status = 201, description = "Performance recorded", body = Performance),
        (status = 404, description = "Joke or routine not found")
    ),
    tag = "Performances"
)]
pub async fn record_performance(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreatePerformanceRequest>,
) -> Result<(StatusCode, Json<Performance>), ApiError> {
    let performance = state
        .joke_service
        .record_performance(owner.as_str(), id, payload.into())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(performance)))
}

/// Delete a performance
#[utoipa::path(
    delete,
    path = "/api/performances/{id}",
    params(("id" = Uuid, Path, description = "Performance ID")),
    responses(
        (status = 204, description = "Performance deleted"),
        (status = 404, description = "Performance not found")
    ),
    tag = "Performances"
)]
pub async fn delete_performance(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .joke_service
        .delete_performance(owner.as_str(), id)
        .await
        .map_err(error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/jokes", get(list_jokes).post(create_joke))
        .route(
            "/api/jokes/:id",
            get(get_joke).patch(update_joke).delete(delete_joke),
        )
        .route(
            "/api/jokes/:id/versions/:version_id/restore",
            post(restore_version),
        )
        .route(
            "/api/jokes/:id/performances",
            get(list_performances).post(record_performance),
        )
        .route("/api/performances/:id", delete(delete_performance))
}
