//! SuggestionSource - Where a suggestion list came from

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provenance of generated suggestions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    /// Decoded from the external model's response
    Model,
    /// Produced locally because the model call failed
    Fallback,
}

impl std::fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestionSource::Model => write!(f, "model"),
            SuggestionSource::Fallback => write!(f, "fallback"),
        }
    }
}
