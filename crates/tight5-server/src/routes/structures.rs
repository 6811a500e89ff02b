//! Structure Routes - Joke-construction template catalog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use tight5::domain::services::structures;
use tight5::{DomainError, StructureTemplate};

use super::{error_response, ApiError};
use crate::auth::Owner;
use crate::models::{BuildJokeRequest, JokeResponse, StructureCatalogResponse, StructureQuery};
use crate::AppState;

/// Categories and templates, optionally narrowed to one category
#[utoipa::path(
    get,
    path = "/api/structures",
    params(StructureQuery),
    responses(
        (status = 200, description = "Structure catalog", body = StructureCatalogResponse),
        (status = 404, description = "Unknown category")
    ),
    tag = "Structures"
)]
pub async fn list_structures(
    Query(query): Query<StructureQuery>,
) -> Result<Json<StructureCatalogResponse>, ApiError> {
    let structures = match query.category.as_deref() {
        Some(category) => {
            structures::find_category(category).ok_or_else(|| {
                error_response(DomainError::not_found_str("Category", category))
            })?;
            structures::by_category(category)
                .into_iter()
                .cloned()
                .collect()
        }
        None => structures::all().to_vec(),
    };

    Ok(Json(StructureCatalogResponse {
        categories: structures::categories().to_vec(),
        structures,
    }))
}

/// Get structure template by ID
#[utoipa::path(
    get,
    path = "/api/structures/{id}",
    params(("id" = String, Path, description = "Structure ID")),
    responses(
        (status = 200, description = "Structure found", body = StructureTemplate),
        (status = 404, description = "Structure not found")
    ),
    tag = "Structures"
)]
pub async fn get_structure(Path(id): Path<String>) -> Result<Json<StructureTemplate>, ApiError> {
    structures::find(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error_response(DomainError::not_found_str("Structure", &id)))
}

/// Create a joke from part selections
#[utoipa::path(
    post,
    path = "/api/structures/{id}/build",
    params(("id" = String, Path, description = "Structure ID")),
    request_body = BuildJokeRequest,
    responses(
        (status = 201, description = "Joke created", body = JokeResponse),
        (status = 400, description = "First or last part has no selection"),
        (status = 404, description = "Structure not found")
    ),
    tag = "Structures"
)]
pub async fn build_joke(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<String>,
    Json(payload): Json<BuildJokeRequest>,
) -> Result<(StatusCode, Json<JokeResponse>), ApiError> {
    let template = structures::find(&id)
        .ok_or_else(|| error_response(DomainError::not_found_str("Structure", &id)))?;

    let new = structures::build_joke(
        template,
        &payload.title,
        &payload.selections,
        payload.notes.as_deref(),
    )
    .map_err(error_response)?;

    let joke = state
        .joke_service
        .create(owner.as_str(), new)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(joke.into())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/structures", get(list_structures))
        .route("/api/structures/:id", get(get_structure))
        .route("/api/structures/:id/build", post(build_joke))
}
