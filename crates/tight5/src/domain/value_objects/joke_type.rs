//! JokeType - Structural classification of a joke

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structural type of a joke
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum JokeType {
    #[default]
    Observational,
    OneLiner,
    Story,
    Callback,
    CrowdWork,
}

impl JokeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JokeType::Observational => "observational",
            JokeType::OneLiner => "one-liner",
            JokeType::Story => "story",
            JokeType::Callback => "callback",
            JokeType::CrowdWork => "crowd-work",
        }
    }
}

impl std::fmt::Display for JokeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for JokeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "observational" => Ok(JokeType::Observational),
            "one-liner" => Ok(JokeType::OneLiner),
            "story" => Ok(JokeType::Story),
            "callback" => Ok(JokeType::Callback),
            "crowd-work" => Ok(JokeType::CrowdWork),
            _ => Err(format!("Unknown joke type: {}", s)),
        }
    }
}
