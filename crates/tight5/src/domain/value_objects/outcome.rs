//! Outcome - How a single performance of a joke landed

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of delivering a joke once
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Killed,
    Worked,
    #[default]
    Neutral,
    Bombed,
}

impl Outcome {
    /// Fixed score used by performance ratings.
    ///
    /// These numbers are part of the public contract and must not be tuned.
    pub fn score(&self) -> u32 {
        match self {
            Outcome::Killed => 100,
            Outcome::Worked => 70,
            Outcome::Neutral => 50,
            Outcome::Bombed => 20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Killed => "killed",
            Outcome::Worked => "worked",
            Outcome::Neutral => "neutral",
            Outcome::Bombed => "bombed",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "killed" => Ok(Outcome::Killed),
            "worked" => Ok(Outcome::Worked),
            "neutral" => Ok(Outcome::Neutral),
            "bombed" => Ok(Outcome::Bombed),
            _ => Err(format!("Unknown outcome: {}", s)),
        }
    }
}
