//! Sorting and filtering options for joke collections

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Energy, JokeStatus, JokeType};

/// Field a joke list can be sorted by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum JokeSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    EstimatedTime,
    PerformanceRating,
}

impl std::str::FromStr for JokeSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(JokeSortField::CreatedAt),
            "updatedAt" => Ok(JokeSortField::UpdatedAt),
            "title" => Ok(JokeSortField::Title),
            "estimatedTime" => Ok(JokeSortField::EstimatedTime),
            "performanceRating" => Ok(JokeSortField::PerformanceRating),
            _ => Err(format!("Unknown sort field: {}", s)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// Sort field plus direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema)]
pub struct JokeSortOption {
    pub field: JokeSortField,
    pub direction: SortDirection,
}

impl JokeSortOption {
    pub fn new(field: JokeSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Filters over a joke list.
///
/// Every provided field must match (AND). Inside `tags` a single shared tag is enough (OR).
/// Empty lists and empty search strings count as "not provided".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct JokeFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<JokeStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<Vec<Energy>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub joke_type: Option<Vec<JokeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl JokeFilters {
    /// True when no filter would exclude anything
    pub fn is_empty(&self) -> bool {
        fn unset<T>(v: &Option<Vec<T>>) -> bool {
            v.as_ref().map_or(true, |v| v.is_empty())
        }

        unset(&self.status)
            && unset(&self.energy)
            && unset(&self.joke_type)
            && unset(&self.tags)
            && self.search.as_deref().map_or(true, str::is_empty)
    }
}
