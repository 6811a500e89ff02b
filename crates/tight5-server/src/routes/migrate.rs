//! Migrate Route - Import jokes and routines kept in browser storage

use axum::{extract::State, routing::post, Extension, Json, Router};

use super::{error_response, ApiError};
use crate::auth::Owner;
use crate::models::{MigrateRequest, MigrateResponse};
use crate::AppState;

/// Import legacy jokes (with versions and performances) and routines
#[utoipa::path(
    post,
    path = "/api/migrate",
    request_body = MigrateRequest,
    responses(
        (status = 200, description = "Import summary", body = MigrateResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Migrate"
)]
pub async fn migrate(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Json(payload): Json<MigrateRequest>,
) -> Result<Json<MigrateResponse>, ApiError> {
    let report = state
        .migration_service
        .migrate(owner.as_str(), payload.jokes, payload.routines)
        .await
        .map_err(error_response)?;

    Ok(Json(MigrateResponse {
        success: true,
        jokes_created: report.jokes_created,
        routines_created: report.routines_created,
        message: report.message(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/migrate", post(migrate))
}
