//! Assistant tasks - Everything the external model can be asked to do
//!
//! One closed enum; each variant carries exactly the context its prompt needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Joke, SelectedPartOption, StructureTemplate};
use crate::domain::value_objects::{Energy, JokeType, Outcome};

/// Joke as it appears in routine prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutineJokeSummary {
    pub id: String,
    pub title: String,
    pub energy: Energy,
    #[serde(rename = "type")]
    pub joke_type: JokeType,
    #[serde(default)]
    pub estimated_time: u32,
}

impl From<&Joke> for RoutineJokeSummary {
    fn from(joke: &Joke) -> Self {
        Self {
            id: joke.id.to_string(),
            title: joke.title.clone(),
            energy: joke.energy,
            joke_type: joke.joke_type,
            estimated_time: joke.estimated_time,
        }
    }
}

/// Joke being placed into an existing routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlacementCandidate {
    pub title: String,
    pub energy: Energy,
    #[serde(rename = "type")]
    pub joke_type: JokeType,
}

/// One performance as it appears in performance prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub date: DateTime<Utc>,
    pub outcome: Outcome,
    pub actual_time: u32,
    pub joke_title: String,
}

/// Kind of work requested from the model
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantTask {
    /// Three setups for a premise
    SetupGeneration { premise: String },
    /// Five punchlines for a setup
    PunchlineGeneration { setup: String },
    /// Options for one part of a structure template
    StructurePart {
        premise: String,
        template: StructureTemplate,
        part_id: String,
        selections: Vec<SelectedPartOption>,
    },
    JokeImprovement {
        setup: String,
        punchline: String,
        direction: String,
    },
    JokeAnalysis {
        setup: String,
        punchline: String,
        tags: Vec<String>,
    },
    /// Three to five toppers
    TagSuggestion { setup: String, punchline: String },
    RoutineFlow { jokes: Vec<RoutineJokeSummary> },
    RoutineOptimization { jokes: Vec<RoutineJokeSummary> },
    Placement {
        new_joke: PlacementCandidate,
        jokes: Vec<RoutineJokeSummary>,
    },
    PerformanceAnalysis { performances: Vec<PerformanceSummary> },
}

impl AssistantTask {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            AssistantTask::SetupGeneration { .. } => "setup-generation",
            AssistantTask::PunchlineGeneration { .. } => "punchline-generation",
            AssistantTask::StructurePart { .. } => "structure-part",
            AssistantTask::JokeImprovement { .. } => "joke-improvement",
            AssistantTask::JokeAnalysis { .. } => "joke-analysis",
            AssistantTask::TagSuggestion { .. } => "tag-suggestion",
            AssistantTask::RoutineFlow { .. } => "routine-flow",
            AssistantTask::RoutineOptimization { .. } => "routine-optimization",
            AssistantTask::Placement { .. } => "placement",
            AssistantTask::PerformanceAnalysis { .. } => "performance-analysis",
        }
    }

    /// Suggestion-list tasks; everything else decodes to a typed object
    pub fn is_suggestion_list(&self) -> bool {
        matches!(
            self,
            AssistantTask::SetupGeneration { .. }
                | AssistantTask::PunchlineGeneration { .. }
                | AssistantTask::StructurePart { .. }
                | AssistantTask::TagSuggestion { .. }
        )
    }
}
