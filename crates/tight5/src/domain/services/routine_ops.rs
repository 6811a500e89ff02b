//! Routine editing as pure list operations
//!
//! Drag-and-drop, insert and remove all reduce to edits of the ordered id list. Ids may repeat.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::entities::{Joke, RoutineJokeSummary};
use crate::domain::errors::DomainError;

/// Remove the id at `from` and reinsert it at `to`. `to` is clamped to the end of the list.
pub fn move_joke(joke_ids: &mut Vec<Uuid>, from: usize, to: usize) -> Result<(), DomainError> {
    if from >= joke_ids.len() {
        return Err(DomainError::Validation(format!(
            "Position {} is out of range for a routine of {} jokes",
            from,
            joke_ids.len()
        )));
    }
    let id = joke_ids.remove(from);
    let to = to.min(joke_ids.len());
    joke_ids.insert(to, id);
    Ok(())
}

/// Insert at `position` (clamped) or append
pub fn insert_joke(joke_ids: &mut Vec<Uuid>, joke_id: Uuid, position: Option<usize>) {
    match position {
        Some(position) => {
            let position = position.min(joke_ids.len());
            joke_ids.insert(position, joke_id);
        }
        None => joke_ids.push(joke_id),
    }
}

/// Remove every occurrence. Returns how many were removed.
pub fn remove_joke(joke_ids: &mut Vec<Uuid>, joke_id: Uuid) -> usize {
    let before = joke_ids.len();
    joke_ids.retain(|id| *id != joke_id);
    before - joke_ids.len()
}

/// Resolve ids in running order, skipping ones that no longer exist
pub fn routine_jokes<'a>(joke_ids: &[Uuid], jokes: &'a HashMap<Uuid, Joke>) -> Vec<&'a Joke> {
    joke_ids.iter().filter_map(|id| jokes.get(id)).collect()
}

/// Project the running order into the summary shape used by routine prompts
pub fn joke_summaries(joke_ids: &[Uuid], jokes: &HashMap<Uuid, Joke>) -> Vec<RoutineJokeSummary> {
    routine_jokes(joke_ids, jokes)
        .into_iter()
        .map(RoutineJokeSummary::from)
        .collect()
}

/// How a routine's length compares to its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeStatus {
    pub current_time: u32,
    pub target_time: u32,
    /// Share of the target used, in percent. Not capped.
    pub percent: f64,
    pub over_time: bool,
}

pub fn time_status(current_time: u32, target_time: u32) -> TimeStatus {
    let percent = if target_time == 0 {
        0.0
    } else {
        f64::from(current_time) / f64::from(target_time) * 100.0
    };
    TimeStatus {
        current_time,
        target_time,
        percent,
        over_time: current_time > target_time,
    }
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewJoke;
    use crate::domain::value_objects::Energy;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_move_joke_forward_and_back() {
        let original = ids(4);
        let mut list = original.clone();

        move_joke(&mut list, 0, 2).unwrap();
        assert_eq!(list, vec![original[1], original[2], original[0], original[3]]);

        move_joke(&mut list, 3, 0).unwrap();
        assert_eq!(list, vec![original[3], original[1], original[2], original[0]]);
    }

    #[test]
    fn test_move_joke_clamps_destination() {
        let original = ids(3);
        let mut list = original.clone();
        move_joke(&mut list, 0, 99).unwrap();
        assert_eq!(list, vec![original[1], original[2], original[0]]);
    }

    #[test]
    fn test_move_joke_out_of_range_source() {
        let mut list = ids(2);
        let err = move_joke(&mut list, 5, 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_insert_joke() {
        let original = ids(2);
        let new_id = Uuid::new_v4();

        let mut appended = original.clone();
        insert_joke(&mut appended, new_id, None);
        assert_eq!(appended.last(), Some(&new_id));

        let mut front = original.clone();
        insert_joke(&mut front, new_id, Some(0));
        assert_eq!(front[0], new_id);

        let mut clamped = original.clone();
        insert_joke(&mut clamped, new_id, Some(10));
        assert_eq!(clamped, vec![original[0], original[1], new_id]);
    }

    #[test]
    fn test_remove_joke_removes_every_occurrence() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut list = vec![a, b, a, b, a];
        assert_eq!(remove_joke(&mut list, a), 3);
        assert_eq!(list, vec![b, b]);
        assert_eq!(remove_joke(&mut list, a), 0);
    }

    #[test]
    fn test_routine_jokes_skips_missing() {
        let joke = Joke::new(
            "owner",
            NewJoke {
                title: "Gym".to_string(),
                setup: "s".to_string(),
                punchline: "p".to_string(),
                energy: Some(Energy::High),
                ..Default::default()
            },
        );
        let lookup: HashMap<_, _> = [(joke.id, joke.clone())].into_iter().collect();
        let list = vec![Uuid::new_v4(), joke.id, joke.id];

        let resolved = routine_jokes(&list, &lookup);
        assert_eq!(resolved.len(), 2);

        let summaries = joke_summaries(&list, &lookup);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, joke.id.to_string());
        assert_eq!(summaries[0].energy, Energy::High);
        assert_eq!(summaries[0].estimated_time, 30);
    }

    #[test]
    fn test_time_status() {
        let status = time_status(330, 300);
        assert!(status.over_time);
        assert!((status.percent - 110.0).abs() < 1e-9);

        let exact = time_status(300, 300);
        assert!(!exact.over_time);

        let no_target = time_status(10, 0);
        assert_eq!(no_target.percent, 0.0);
        assert!(no_target.over_time);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(300), "5:00");
        assert_eq!(format_time(3599), "59:59");
    }
}
