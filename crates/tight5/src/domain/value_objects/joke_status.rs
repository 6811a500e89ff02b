//! JokeStatus - Lifecycle stage of a joke

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a joke
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JokeStatus {
    #[default]
    Draft,
    Working,
    Polished,
    Retired,
}

impl JokeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JokeStatus::Draft => "draft",
            JokeStatus::Working => "working",
            JokeStatus::Polished => "polished",
            JokeStatus::Retired => "retired",
        }
    }
}

impl std::fmt::Display for JokeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for JokeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(JokeStatus::Draft),
            "working" => Ok(JokeStatus::Working),
            "polished" => Ok(JokeStatus::Polished),
            "retired" => Ok(JokeStatus::Retired),
            _ => Err(format!("Unknown joke status: {}", s)),
        }
    }
}
