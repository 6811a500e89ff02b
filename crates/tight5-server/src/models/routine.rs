//! Routine DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use tight5::domain::services::{format_time, time_status, TimeStatus};
use tight5::{NewRoutine, Routine, RoutineChanges};

/// Request to create a routine
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoutineRequest {
    pub name: String,
    /// Seconds, defaults to 300
    pub target_time: Option<u32>,
    #[serde(default)]
    pub joke_ids: Vec<Uuid>,
    pub flow_score: Option<u8>,
}

impl From<CreateRoutineRequest> for NewRoutine {
    fn from(req: CreateRoutineRequest) -> Self {
        NewRoutine {
            name: req.name,
            target_time: req.target_time,
            joke_ids: req.joke_ids,
            flow_score: req.flow_score,
        }
    }
}

/// Partial update; `jokeIds` replaces the whole running order
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoutineRequest {
    pub name: Option<String>,
    pub target_time: Option<u32>,
    pub flow_score: Option<u8>,
    pub joke_ids: Option<Vec<Uuid>>,
}

impl From<UpdateRoutineRequest> for RoutineChanges {
    fn from(req: UpdateRoutineRequest) -> Self {
        RoutineChanges {
            name: req.name,
            target_time: req.target_time,
            flow_score: req.flow_score,
            joke_ids: req.joke_ids,
        }
    }
}

/// Routine with its time budget status
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutineResponse {
    #[serde(flatten)]
    pub routine: Routine,
    pub time_status: TimeStatus,
    /// Current length as `m:ss`
    pub formatted_time: String,
}

impl From<Routine> for RoutineResponse {
    fn from(routine: Routine) -> Self {
        let time_status = time_status(routine.current_time, routine.target_time);
        let formatted_time = format_time(routine.current_time);
        Self {
            routine,
            time_status,
            formatted_time,
        }
    }
}

/// Insert a joke into the running order
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertJokeRequest {
    pub joke_id: Uuid,
    /// Zero-based; past the end appends. Omit to append.
    pub position: Option<usize>,
}

/// Move the joke at `from` to `to` (zero-based)
#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveJokeRequest {
    pub from: usize,
    pub to: usize,
}
