//! Assistant DTOs
//!
//! Missing text fields deserialize as empty strings so the service can answer them with the
//! generic invalid-input message instead of a body rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use tight5::domain::entities::{
    FlowAnalysis, PerformanceSummary, PlacementCandidate, PlacementSuggestions,
    RoutineJokeSummary, SelectedPartOption, WeaknessReport,
};
use tight5::domain::services::guardrail::INVALID_INPUT_MESSAGE;
use tight5::domain::services::structures;
use tight5::{AssistantTask, DomainError, SuggestionSource};

use crate::application::SuggestionList;
use crate::models::RoutineResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationKind {
    Setup,
    Punchline,
    StructurePart,
}

/// Generation request
///
/// `content` is the premise for `setup` and `structure-part`, and the setup for `punchline`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(rename = "type")]
    pub kind: GenerationKind,
    #[serde(default)]
    pub content: String,
    pub structure_id: Option<String>,
    pub part_id: Option<String>,
    /// Picks made for earlier parts
    #[serde(default)]
    pub selections: Vec<SelectedPartOption>,
}

impl GenerateRequest {
    pub fn into_task(self) -> Result<AssistantTask, DomainError> {
        match self.kind {
            GenerationKind::Setup => Ok(AssistantTask::SetupGeneration {
                premise: self.content,
            }),
            GenerationKind::Punchline => Ok(AssistantTask::PunchlineGeneration {
                setup: self.content,
            }),
            GenerationKind::StructurePart => {
                let (Some(structure_id), Some(part_id)) = (self.structure_id, self.part_id) else {
                    return Err(DomainError::Validation(INVALID_INPUT_MESSAGE.to_string()));
                };
                let template = structures::find(&structure_id)
                    .ok_or_else(|| DomainError::not_found_str("Structure", &structure_id))?;
                if template.part(&part_id).is_none() {
                    return Err(DomainError::Validation(format!(
                        "Unknown part '{}' for structure '{}'",
                        part_id, structure_id
                    )));
                }
                Ok(AssistantTask::StructurePart {
                    premise: self.content,
                    template: template.clone(),
                    part_id,
                    selections: self.selections,
                })
            }
        }
    }
}

/// Suggestion list with provenance
#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
    /// `model`, or `fallback` when the model could not be reached
    pub source: SuggestionSource,
}

impl From<SuggestionList> for SuggestionsResponse {
    fn from(list: SuggestionList) -> Self {
        Self {
            suggestions: list.suggestions,
            source: list.source,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImproveJokeRequest {
    #[serde(default)]
    pub setup: String,
    #[serde(default)]
    pub punchline: String,
    /// Free-text direction such as "make it darker"
    #[serde(default)]
    pub direction: String,
}

/// Critique a joke, or ask for toppers when `requestTags` is set
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJokeRequest {
    #[serde(default)]
    pub setup: String,
    #[serde(default)]
    pub punchline: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub request_tags: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AnalyzeJokeResponse {
    Analysis(WeaknessReport),
    Tags(SuggestionsResponse),
}

/// Flow analysis, or placement of `newJoke` when `requestPlacement` is set
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRoutineRequest {
    #[serde(default)]
    pub jokes: Vec<RoutineJokeSummary>,
    pub new_joke: Option<PlacementCandidate>,
    #[serde(default)]
    pub request_placement: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AnalyzeRoutineResponse {
    Flow(FlowAnalysis),
    Placement(PlacementSuggestions),
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OptimizeRoutineRequest {
    #[serde(default)]
    pub jokes: Vec<RoutineJokeSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzePerformanceRequest {
    #[serde(default)]
    pub performances: Vec<PerformanceSummary>,
}

/// Flow analysis of a stored routine, with the routine after its score was saved
#[derive(Debug, Serialize, ToSchema)]
pub struct RoutineFlowResponse {
    pub analysis: FlowAnalysis,
    pub routine: RoutineResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_kinds() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"type":"punchline","content":"My cat judges me"}"#).unwrap();
        assert_eq!(
            req.into_task().unwrap(),
            AssistantTask::PunchlineGeneration {
                setup: "My cat judges me".to_string()
            }
        );

        assert!(serde_json::from_str::<GenerateRequest>(r#"{"type":"limerick"}"#).is_err());
    }

    #[test]
    fn test_structure_part_needs_known_template_and_part() {
        let template = &structures::all()[0];
        let part = &template.parts[0];

        let req = GenerateRequest {
            kind: GenerationKind::StructurePart,
            content: "dating apps".to_string(),
            structure_id: Some(template.id.clone()),
            part_id: Some(part.id.clone()),
            selections: vec![],
        };
        assert!(matches!(
            req.into_task(),
            Ok(AssistantTask::StructurePart { .. })
        ));

        let req = GenerateRequest {
            kind: GenerationKind::StructurePart,
            content: "dating apps".to_string(),
            structure_id: Some("no-such-structure".to_string()),
            part_id: Some(part.id.clone()),
            selections: vec![],
        };
        assert!(matches!(req.into_task(), Err(DomainError::NotFound { .. })));

        let req = GenerateRequest {
            kind: GenerationKind::StructurePart,
            content: "dating apps".to_string(),
            structure_id: Some(template.id.clone()),
            part_id: None,
            selections: vec![],
        };
        assert!(matches!(req.into_task(), Err(DomainError::Validation(_))));
    }
}
