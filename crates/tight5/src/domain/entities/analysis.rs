//! Analysis results decoded from the external model
//!
//! Field names match what the model is asked to return, so these types double as the
//! client-facing response shapes. Scores are decoded leniently and clamped to 0-100;
//! closed enumerations are not coerced.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RoutineSuggestion;
use crate::domain::services::score;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Rewrite of a joke in a requested direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JokeImprovement {
    pub setup: String,
    pub punchline: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WeaknessKind {
    SetupTooLong,
    UnclearPunchline,
    WeakTag,
    Timing,
    Structure,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeaknessLocation {
    Setup,
    Punchline,
    Tags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Weakness {
    #[serde(rename = "type")]
    pub kind: WeaknessKind,
    pub description: String,
    pub location: WeaknessLocation,
    pub severity: Severity,
}

/// Critique of a single joke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessReport {
    #[serde(default)]
    pub weaknesses: Vec<Weakness>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(deserialize_with = "score::lenient")]
    pub overall_score: u8,
    #[serde(default)]
    pub recommended_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallbackOpportunity {
    pub joke_id1: String,
    pub joke_id2: String,
    pub reason: String,
    #[serde(deserialize_with = "score::lenient")]
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_callback: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FlowIssueKind {
    RepetitiveTopic,
    EnergyDrop,
    TimingIssue,
    WeakOpening,
    WeakClosing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowIssue {
    #[serde(rename = "type")]
    pub kind: FlowIssueKind,
    pub description: String,
    #[serde(default)]
    pub affected_joke_ids: Vec<String>,
    pub severity: Severity,
}

/// Flow critique of a running order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowAnalysis {
    #[serde(deserialize_with = "score::lenient")]
    pub flow_score: u8,
    /// One energy level per joke, in running order
    #[serde(default, deserialize_with = "score::lenient_vec")]
    pub energy_progression: Vec<u8>,
    #[serde(deserialize_with = "score::lenient")]
    pub topic_diversity: u8,
    #[serde(default)]
    pub callbacks: Vec<CallbackOpportunity>,
    #[serde(default)]
    pub suggestions: Vec<RoutineSuggestion>,
    #[serde(default)]
    pub issues: Vec<FlowIssue>,
}

/// Proposed running order. `optimized_order` must be a permutation of the input ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutineOptimization {
    pub optimized_order: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlacementSuggestion {
    /// 0-indexed slot in the running order
    pub position: u32,
    #[serde(deserialize_with = "score::lenient")]
    pub score: u8,
    pub reasoning: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

/// Top candidate slots for a new joke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlacementSuggestions {
    pub suggestions: Vec<PlacementSuggestion>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PerformancePattern {
    pub pattern: String,
    pub description: String,
    #[serde(deserialize_with = "score::lenient_count")]
    pub frequency: u32,
    pub impact: Impact,
}

/// Patterns across a performance history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInsights {
    #[serde(deserialize_with = "score::lenient")]
    pub overall_rating: u8,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<PerformancePattern>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub best_jokes: Vec<String>,
    #[serde(default)]
    pub worst_jokes: Vec<String>,
}
