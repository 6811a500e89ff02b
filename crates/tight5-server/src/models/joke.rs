//! Joke DTOs
//!
//! Request bodies, query parameters and responses for `/api/jokes`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use tight5::domain::entities::JokeStructureSelection;
use tight5::domain::services::metrics::performance_rating;
use tight5::domain::value_objects::{JokeSortField, SortDirection, Technique};
use tight5::{
    Energy, Joke, JokeChanges, JokeFilters, JokeSortOption, JokeStatus, JokeType, NewJoke,
    NewPerformance, Outcome,
};

/// Request to create a joke
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJokeRequest {
    pub title: String,
    pub setup: String,
    pub punchline: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub estimated_time: Option<u32>,
    pub energy: Option<Energy>,
    #[serde(rename = "type")]
    pub joke_type: Option<JokeType>,
    pub status: Option<JokeStatus>,
    pub notes: Option<String>,
    pub structure: Option<JokeStructureSelection>,
    #[serde(default)]
    pub techniques: Vec<Technique>,
}

impl From<CreateJokeRequest> for NewJoke {
    fn from(req: CreateJokeRequest) -> Self {
        NewJoke {
            title: req.title,
            setup: req.setup,
            punchline: req.punchline,
            tags: req.tags,
            estimated_time: req.estimated_time,
            energy: req.energy,
            joke_type: req.joke_type,
            status: req.status,
            notes: req.notes,
            structure: req.structure,
            techniques: req.techniques,
        }
    }
}

/// Partial update; absent fields are left alone
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJokeRequest {
    pub title: Option<String>,
    pub setup: Option<String>,
    pub punchline: Option<String>,
    pub tags: Option<Vec<String>>,
    pub estimated_time: Option<u32>,
    pub energy: Option<Energy>,
    #[serde(rename = "type")]
    pub joke_type: Option<JokeType>,
    pub status: Option<JokeStatus>,
    pub notes: Option<String>,
    pub techniques: Option<Vec<Technique>>,
}

impl From<UpdateJokeRequest> for JokeChanges {
    fn from(req: UpdateJokeRequest) -> Self {
        JokeChanges {
            title: req.title,
            setup: req.setup,
            punchline: req.punchline,
            tags: req.tags,
            estimated_time: req.estimated_time,
            energy: req.energy,
            joke_type: req.joke_type,
            status: req.status,
            notes: req.notes,
            techniques: req.techniques,
        }
    }
}

/// Joke with its derived rating
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JokeResponse {
    #[serde(flatten)]
    pub joke: Joke,
    /// Mean outcome score of all performances, 0 when never performed
    pub performance_rating: f64,
}

impl From<Joke> for JokeResponse {
    fn from(joke: Joke) -> Self {
        let performance_rating = performance_rating(&joke.performances);
        Self {
            joke,
            performance_rating,
        }
    }
}

/// Filter and sort parameters for listing jokes
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JokeListQuery {
    /// Comma-separated statuses
    pub status: Option<String>,
    /// Comma-separated energy levels
    pub energy: Option<String>,
    /// Comma-separated joke types
    #[serde(rename = "type")]
    pub joke_type: Option<String>,
    /// Comma-separated tags; a joke matches when it shares any of them
    pub tags: Option<String>,
    /// Case-insensitive text search over title, setup, punchline and notes
    pub search: Option<String>,
    /// createdAt, updatedAt, title, estimatedTime or performanceRating
    pub sort: Option<String>,
    /// asc or desc
    pub direction: Option<String>,
}

fn parse_list<T: FromStr<Err = String>>(raw: Option<&str>) -> Result<Option<Vec<T>>, String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::parse)
            .collect()
    })
    .transpose()
}

impl JokeListQuery {
    pub fn filters(&self) -> Result<JokeFilters, String> {
        Ok(JokeFilters {
            status: parse_list(self.status.as_deref())?,
            energy: parse_list(self.energy.as_deref())?,
            joke_type: parse_list(self.joke_type.as_deref())?,
            tags: self.tags.as_deref().map(|t| {
                t.split(',')
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect()
            }),
            search: self.search.clone(),
        })
    }

    pub fn sort(&self) -> Result<JokeSortOption, String> {
        let field = match &self.sort {
            Some(s) => s.parse::<JokeSortField>()?,
            None => JokeSortField::default(),
        };
        let direction = match &self.direction {
            Some(d) => d.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };
        Ok(JokeSortOption::new(field, direction))
    }
}

/// Request to record a performance of a joke
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerformanceRequest {
    pub routine_id: Option<Uuid>,
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
    pub actual_time: u32,
    pub outcome: Outcome,
    #[serde(default)]
    pub notes: String,
    pub venue: Option<String>,
}

impl From<CreatePerformanceRequest> for NewPerformance {
    fn from(req: CreatePerformanceRequest) -> Self {
        NewPerformance {
            routine_id: req.routine_id,
            date: req.date,
            actual_time: req.actual_time,
            outcome: req.outcome,
            notes: req.notes,
            venue: req.venue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parses_lists_and_sort() {
        let query = JokeListQuery {
            status: Some("draft, polished".to_string()),
            joke_type: Some("one-liner".to_string()),
            tags: Some("travel,,family".to_string()),
            sort: Some("performanceRating".to_string()),
            direction: Some("ASC".to_string()),
            ..Default::default()
        };

        let filters = query.filters().unwrap();
        assert_eq!(
            filters.status,
            Some(vec![JokeStatus::Draft, JokeStatus::Polished])
        );
        assert_eq!(filters.joke_type, Some(vec![JokeType::OneLiner]));
        assert_eq!(
            filters.tags,
            Some(vec!["travel".to_string(), "family".to_string()])
        );
        assert!(filters.energy.is_none());

        let sort = query.sort().unwrap();
        assert_eq!(sort.field, JokeSortField::PerformanceRating);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_query_rejects_unknown_values() {
        let query = JokeListQuery {
            energy: Some("extreme".to_string()),
            ..Default::default()
        };
        assert!(query.filters().is_err());

        let query = JokeListQuery {
            sort: Some("funniness".to_string()),
            ..Default::default()
        };
        assert!(query.sort().is_err());
    }

    #[test]
    fn test_create_request_rejects_unknown_enum() {
        let body = r#"{"title":"t","setup":"s","punchline":"p","energy":"volcanic"}"#;
        assert!(serde_json::from_str::<CreateJokeRequest>(body).is_err());
    }

    #[test]
    fn test_response_flattens_joke() {
        let joke = Joke::new(
            "owner",
            NewJoke {
                title: "Airports".to_string(),
                setup: "s".to_string(),
                punchline: "p".to_string(),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(JokeResponse::from(joke)).unwrap();
        assert_eq!(json["title"], "Airports");
        assert_eq!(json["type"], "observational");
        assert_eq!(json["performanceRating"], 0.0);
        assert!(json.get("ownerId").is_none());
    }
}
