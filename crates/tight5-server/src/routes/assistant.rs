//! Assistant Routes - Model-assisted writing
//!
//! Every handler here sits behind the per-owner rate limiter.

use axum::{
    extract::{Path, State},
    routing::post,
    Extension, Json, Router,
};
use uuid::Uuid;

use tight5::domain::entities::{
    JokeImprovement, PerformanceInsights, RoutineOptimization,
};
use tight5::domain::services::guardrail::INVALID_INPUT_MESSAGE;
use tight5::{AssistantTask, DomainError};

use super::{error_response, ApiError};
use crate::auth::Owner;
use crate::models::{
    AnalyzeJokeRequest, AnalyzeJokeResponse, AnalyzePerformanceRequest, AnalyzeRoutineRequest,
    AnalyzeRoutineResponse, GenerateRequest, ImproveJokeRequest, OptimizeRoutineRequest,
    RoutineFlowResponse, SuggestionsResponse,
};
use crate::AppState;

/// Generate setups, punchlines or options for one structure part
#[utoipa::path(
    post,
    path = "/api/joke/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Suggestions", body = SuggestionsResponse),
        (status = 400, description = "Missing or off-topic input"),
        (status = 429, description = "Too many requests"),
        (status = 502, description = "Model reply unusable")
    ),
    tag = "Assistant"
)]
pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let task = payload.into_task().map_err(error_response)?;
    let list = state
        .assistant_service
        .suggest(task)
        .await
        .map_err(error_response)?;

    Ok(Json(list.into()))
}

/// Rewrite a joke in a requested direction
#[utoipa::path(
    post,
    path = "/api/joke/improve",
    request_body = ImproveJokeRequest,
    responses(
        (status = 200, description = "Improved joke", body = JokeImprovement),
        (status = 400, description = "Missing or off-topic input"),
        (status = 502, description = "Model unavailable or reply unusable")
    ),
    tag = "Assistant"
)]
pub async fn improve(
    State(state): State<AppState>,
    Json(payload): Json<ImproveJokeRequest>,
) -> Result<Json<JokeImprovement>, ApiError> {
    let improvement = state
        .assistant_service
        .improve(payload.setup, payload.punchline, payload.direction)
        .await
        .map_err(error_response)?;

    Ok(Json(improvement))
}

/// Critique a joke, or suggest toppers when `requestTags` is set
#[utoipa::path(
    post,
    path = "/api/joke/analyze",
    request_body = AnalyzeJokeRequest,
    responses(
        (status = 200, description = "Weakness report or topper suggestions", body = AnalyzeJokeResponse),
        (status = 400, description = "Missing input"),
        (status = 502, description = "Model unavailable or reply unusable")
    ),
    tag = "Assistant"
)]
pub async fn analyze_joke(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeJokeRequest>,
) -> Result<Json<AnalyzeJokeResponse>, ApiError> {
    let service = &state.assistant_service;

    let response = if payload.request_tags {
        let list = service
            .suggest(AssistantTask::TagSuggestion {
                setup: payload.setup,
                punchline: payload.punchline,
            })
            .await
            .map_err(error_response)?;
        AnalyzeJokeResponse::Tags(list.into())
    } else {
        let report = service
            .analyze_joke(payload.setup, payload.punchline, payload.tags)
            .await
            .map_err(error_response)?;
        AnalyzeJokeResponse::Analysis(report)
    };

    Ok(Json(response))
}

/// Analyze routine flow, or rank placements for `newJoke` when `requestPlacement` is set
#[utoipa::path(
    post,
    path = "/api/routine/analyze",
    request_body = AnalyzeRoutineRequest,
    responses(
        (status = 200, description = "Flow analysis or placement suggestions", body = AnalyzeRoutineResponse),
        (status = 400, description = "Missing input"),
        (status = 502, description = "Model unavailable or reply unusable")
    ),
    tag = "Assistant"
)]
pub async fn analyze_routine(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRoutineRequest>,
) -> Result<Json<AnalyzeRoutineResponse>, ApiError> {
    let service = &state.assistant_service;

    let response = if payload.request_placement {
        let new_joke = payload.new_joke.ok_or_else(|| {
            error_response(DomainError::Validation(INVALID_INPUT_MESSAGE.to_string()))
        })?;
        let placements = service
            .placement(new_joke, payload.jokes)
            .await
            .map_err(error_response)?;
        AnalyzeRoutineResponse::Placement(placements)
    } else {
        let analysis = service
            .analyze_flow(payload.jokes)
            .await
            .map_err(error_response)?;
        AnalyzeRoutineResponse::Flow(analysis)
    };

    Ok(Json(response))
}

/// Propose a better running order
#[utoipa::path(
    post,
    path = "/api/routine/optimize",
    request_body = OptimizeRoutineRequest,
    responses(
        (status = 200, description = "Optimized order", body = RoutineOptimization),
        (status = 400, description = "Missing input"),
        (status = 502, description = "Model unavailable or order unusable")
    ),
    tag = "Assistant"
)]
pub async fn optimize_routine(
    State(state): State<AppState>,
    Json(payload): Json<OptimizeRoutineRequest>,
) -> Result<Json<RoutineOptimization>, ApiError> {
    let optimization = state
        .assistant_service
        .optimize(payload.jokes)
        .await
        .map_err(error_response)?;

    Ok(Json(optimization))
}

/// Find patterns in a performance history
#[utoipa::path(
    post,
    path = "/api/performance/analyze",
    request_body = AnalyzePerformanceRequest,
    responses(
        (status = 200, description = "Performance insights", body = PerformanceInsights),
        (status = 400, description = "Missing input"),
        (status = 502, description = "Model unavailable or reply unusable")
    ),
    tag = "Assistant"
)]
pub async fn analyze_performances(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzePerformanceRequest>,
) -> Result<Json<PerformanceInsights>, ApiError> {
    let insights = state
        .assistant_service
        .analyze_performances(payload.performances)
        .await
        .map_err(error_response)?;

    Ok(Json(insights))
}

/// Analyze a stored routine and save its flow score and suggestions
#[utoipa::path(
    post,
    path = "/api/routines/{id}/flow",
    params(("id" = Uuid, Path, description = "Routine ID")),
    responses(
        (status = 200, description = "Analysis and updated routine", body = RoutineFlowResponse),
        (status = 400, description = "Routine has no jokes"),
        (status = 404, description = "Routine not found"),
        (status = 502, description = "Model unavailable or reply unusable")
    ),
    tag = "Assistant"
)]
pub async fn analyze_stored_routine(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoutineFlowResponse>, ApiError> {
    let (_, summaries) = state
        .routine_service
        .summaries(owner.as_str(), id)
        .await
        .map_err(error_response)?;

    let analysis = state
        .assistant_service
        .analyze_flow(summaries)
        .await
        .map_err(error_response)?;

    let routine = state
        .routine_service
        .record_flow(owner.as_str(), id, &analysis)
        .await
        .map_err(error_response)?;

    Ok(Json(RoutineFlowResponse {
        analysis,
        routine: routine.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/joke/generate", post(generate))
        .route("/api/joke/improve", post(improve))
        .route("/api/joke/analyze", post(analyze_joke))
        .route("/api/routine/analyze", post(analyze_routine))
        .route("/api/routine/optimize", post(optimize_routine))
        .route("/api/performance/analyze", post(analyze_performances))
        .route("/api/routines/:id/flow", post(analyze_stored_routine))
}
