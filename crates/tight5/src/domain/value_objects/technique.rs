//! Technique - Rhetorical technique tags

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rhetorical technique applied in a joke
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    IronySarcasm,
    CharacterVoice,
    BenignViolation,
}

impl Technique {
    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::IronySarcasm => "irony-sarcasm",
            Technique::CharacterVoice => "character-voice",
            Technique::BenignViolation => "benign-violation",
        }
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Technique {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "irony-sarcasm" => Ok(Technique::IronySarcasm),
            "character-voice" => Ok(Technique::CharacterVoice),
            "benign-violation" => Ok(Technique::BenignViolation),
            _ => Err(format!("Unknown technique: {}", s)),
        }
    }
}
