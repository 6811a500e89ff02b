//! Legacy import - jokes and routines exported from browser storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use tight5::{Energy, JokeStatus, JokeType, Outcome};

/// Import request. Items are decoded one by one so a bad item only skips itself.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MigrateRequest {
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub jokes: Vec<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub routines: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrateResponse {
    pub success: bool,
    pub jokes_created: usize,
    pub routines_created: usize,
    pub message: String,
}

/// Epoch milliseconds or an RFC 3339 string
fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Float(f64),
        Text(String),
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Millis(ms)) => DateTime::from_timestamp_millis(ms),
        Some(Raw::Float(ms)) => DateTime::from_timestamp_millis(ms as i64),
        Some(Raw::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
    };
    Ok(parsed)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyJoke {
    pub id: String,
    pub title: String,
    pub setup: String,
    pub punchline: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub estimated_time: Option<u32>,
    #[serde(default)]
    pub energy: Option<Energy>,
    #[serde(default, rename = "type")]
    pub joke_type: Option<JokeType>,
    #[serde(default)]
    pub status: Option<JokeStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub versions: Vec<LegacyVersion>,
    #[serde(default)]
    pub performances: Vec<LegacyPerformance>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyVersion {
    pub setup: String,
    pub punchline: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPerformance {
    #[serde(default, deserialize_with = "timestamp")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_time: Option<u32>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub venue: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRoutine {
    pub name: String,
    #[serde(default)]
    pub joke_ids: Vec<String>,
    #[serde(default)]
    pub target_time: Option<u32>,
    #[serde(default)]
    pub flow_score: Option<f64>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}
