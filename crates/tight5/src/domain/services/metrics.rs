//! Metrics Engine - Derived numbers and orderings over joke collections
//!
//! Everything here is pure and total: missing references contribute nothing instead of failing.

use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::entities::{Joke, Performance};
use crate::domain::value_objects::{JokeFilters, JokeSortField, JokeSortOption, SortDirection};

/// Sum of estimated times for the ids that resolve. Duplicates count every time they appear.
pub fn total_duration(joke_ids: &[Uuid], jokes: &HashMap<Uuid, Joke>) -> u32 {
    joke_ids
        .iter()
        .filter_map(|id| jokes.get(id))
        .map(|joke| joke.estimated_time)
        .sum()
}

/// Mean outcome score, 0 when there is no history
pub fn performance_rating(performances: &[Performance]) -> f64 {
    if performances.is_empty() {
        return 0.0;
    }
    let total: u32 = performances.iter().map(|p| p.outcome.score()).sum();
    f64::from(total) / performances.len() as f64
}

fn compare(a: &Joke, b: &Joke, field: JokeSortField) -> Ordering {
    match field {
        JokeSortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        JokeSortField::EstimatedTime => a.estimated_time.cmp(&b.estimated_time),
        JokeSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        JokeSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        JokeSortField::PerformanceRating => {
            performance_rating(&a.performances).total_cmp(&performance_rating(&b.performances))
        }
    }
}

/// Stable sort. Descending reverses the comparator only, so equal keys keep input order.
pub fn sort_jokes(jokes: &mut [Joke], sort: JokeSortOption) {
    jokes.sort_by(|a, b| {
        let ordering = compare(a, b, sort.field);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Whether a joke satisfies every provided filter
pub fn matches_filters(joke: &Joke, filters: &JokeFilters) -> bool {
    if let Some(statuses) = filters.status.as_ref().filter(|s| !s.is_empty()) {
        if !statuses.contains(&joke.status) {
            return false;
        }
    }
    if let Some(energies) = filters.energy.as_ref().filter(|e| !e.is_empty()) {
        if !energies.contains(&joke.energy) {
            return false;
        }
    }
    if let Some(types) = filters.joke_type.as_ref().filter(|t| !t.is_empty()) {
        if !types.contains(&joke.joke_type) {
            return false;
        }
    }
    if let Some(tags) = filters.tags.as_ref().filter(|t| !t.is_empty()) {
        if !tags.iter().any(|tag| joke.tags.contains(tag)) {
            return false;
        }
    }
    if let Some(search) = filters.search.as_ref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        let haystacks = [&joke.title, &joke.setup, &joke.punchline, &joke.notes];
        if !haystacks
            .iter()
            .any(|text| text.to_lowercase().contains(&needle))
        {
            return false;
        }
    }
    true
}

/// Keep jokes matching all provided filters, in input order
pub fn filter_jokes(jokes: Vec<Joke>, filters: &JokeFilters) -> Vec<Joke> {
    if filters.is_empty() {
        return jokes;
    }
    jokes
        .into_iter()
        .filter(|joke| matches_filters(joke, filters))
        .collect()
}
