//! Performance - One delivery of a joke
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::value_objects::Outcome;

/// Performance - immutable record of a joke being delivered once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub id: Uuid,
    pub joke_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    /// Actual elapsed seconds on stage
    pub actual_time: u32,
    pub outcome: Outcome,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

/// Fields for recording a performance
#[derive(Debug, Clone, Default)]
pub struct NewPerformance {
    pub routine_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub actual_time: u32,
    pub outcome: Outcome,
    pub notes: String,
    pub venue: Option<String>,
}

impl Performance {
    /// Create a new Performance with generated ID. Date defaults to now.
    pub fn new(joke_id: Uuid, new: NewPerformance) -> Self {
        Self {
            id: Uuid::new_v4(),
            joke_id,
            routine_id: new.routine_id,
            date: new.date.unwrap_or_else(Utc::now),
            actual_time: new.actual_time,
            outcome: new.outcome,
            notes: new.notes,
            venue: new.venue,
        }
    }
}
