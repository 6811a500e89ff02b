//! Routine - An ordered, timed set of jokes
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Default routine length: a tight five
pub const DEFAULT_TARGET_TIME: u32 = 300;

/// Routine - holds joke ids in running order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: Uuid,
    #[serde(skip)]
    pub owner_id: String,
    pub name: String,
    /// Running order. The same joke may appear more than once.
    pub joke_ids: Vec<Uuid>,
    /// Target length in seconds
    pub target_time: u32,
    /// Derived from the jokes in `joke_ids`; never trusted from input
    pub current_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ai_suggestions: Vec<RoutineSuggestion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kind of change a routine suggestion proposes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Placement,
    Callback,
    Reorder,
    Remove,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Placement => "placement",
            SuggestionKind::Callback => "callback",
            SuggestionKind::Reorder => "reorder",
            SuggestionKind::Remove => "remove",
        }
    }
}

impl std::str::FromStr for SuggestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "placement" => Ok(SuggestionKind::Placement),
            "callback" => Ok(SuggestionKind::Callback),
            "reorder" => Ok(SuggestionKind::Reorder),
            "remove" => Ok(SuggestionKind::Remove),
            _ => Err(format!("Unknown suggestion type: {}", s)),
        }
    }
}

/// Model-proposed edit to a routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutineSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Kept as text: the model may reference ids it invented
    pub joke_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    pub reason: String,
    /// 0-100
    #[serde(deserialize_with = "crate::domain::services::score::lenient")]
    pub confidence: u8,
}

/// Fields for creating a routine
#[derive(Debug, Clone, Default)]
pub struct NewRoutine {
    pub name: String,
    pub target_time: Option<u32>,
    pub joke_ids: Vec<Uuid>,
    pub flow_score: Option<u8>,
}

/// Partial update of a routine. `joke_ids` replaces the running order.
#[derive(Debug, Clone, Default)]
pub struct RoutineChanges {
    pub name: Option<String>,
    pub target_time: Option<u32>,
    pub flow_score: Option<u8>,
    pub joke_ids: Option<Vec<Uuid>>,
}

impl Routine {
    /// Create a new empty Routine with generated ID and timestamps
    pub fn new(owner_id: impl Into<String>, name: String, target_time: Option<u32>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            name,
            joke_ids: Vec::new(),
            target_time: target_time.unwrap_or(DEFAULT_TARGET_TIME),
            current_time: 0,
            flow_score: None,
            ai_suggestions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
