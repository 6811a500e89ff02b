//! Input validation for jokes and routines
//!
//! Every problem is collected and reported together in one `DomainError::Validation`.

use crate::domain::entities::{JokeChanges, NewJoke};
use crate::domain::errors::DomainError;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_TEXT_CHARS: usize = 5000;
pub const MAX_ESTIMATED_TIME: u32 = 600;
pub const MAX_TARGET_TIME: u32 = 3600;

/// Drop angle brackets and surrounding whitespace
pub fn sanitize_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

fn finish(errors: Vec<String>) -> Result<(), DomainError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors.join("; ")))
    }
}

fn check_text(errors: &mut Vec<String>, value: &str, field: &str, max: usize) {
    if value.trim().is_empty() {
        errors.push(format!("{} is required and must be a string", field));
    } else if value.chars().count() > max {
        errors.push(format!("{} must be less than {} characters", field, max));
    }
}

fn check_estimated_time(errors: &mut Vec<String>, estimated_time: Option<u32>) {
    if estimated_time.is_some_and(|t| t > MAX_ESTIMATED_TIME) {
        errors.push("Estimated time must be a number between 0 and 600 seconds".to_string());
    }
}

pub fn validate_new_joke(joke: &NewJoke) -> Result<(), DomainError> {
    let mut errors = Vec::new();
    check_text(&mut errors, &joke.title, "Title", MAX_TITLE_CHARS);
    check_text(&mut errors, &joke.setup, "Setup", MAX_TEXT_CHARS);
    check_text(&mut errors, &joke.punchline, "Punchline", MAX_TEXT_CHARS);
    check_estimated_time(&mut errors, joke.estimated_time);
    finish(errors)
}

/// Only provided fields are checked
pub fn validate_joke_changes(changes: &JokeChanges) -> Result<(), DomainError> {
    let mut errors = Vec::new();
    if let Some(title) = &changes.title {
        check_text(&mut errors, title, "Title", MAX_TITLE_CHARS);
    }
    if let Some(setup) = &changes.setup {
        check_text(&mut errors, setup, "Setup", MAX_TEXT_CHARS);
    }
    if let Some(punchline) = &changes.punchline {
        check_text(&mut errors, punchline, "Punchline", MAX_TEXT_CHARS);
    }
    check_estimated_time(&mut errors, changes.estimated_time);
    finish(errors)
}

/// `name` is `None` on partial updates that leave it untouched
pub fn validate_routine(name: Option<&str>, target_time: Option<u32>) -> Result<(), DomainError> {
    let mut errors = Vec::new();
    if let Some(name) = name {
        check_text(&mut errors, name, "Name", MAX_TITLE_CHARS);
    }
    if target_time.is_some_and(|t| t > MAX_TARGET_TIME) {
        errors.push("Target time must be a number between 0 and 3600 seconds".to_string());
    }
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewJoke {
        NewJoke {
            title: "Airports".into(),
            setup: "Airports are malls.".into(),
            punchline: "With a fear of commitment.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  <b>bold</b> move "), "bbold/b move");
    }

    #[test]
    fn test_valid_joke_passes() {
        assert!(validate_new_joke(&valid()).is_ok());
        let boundary = NewJoke {
            title: "t".repeat(MAX_TITLE_CHARS),
            estimated_time: Some(MAX_ESTIMATED_TIME),
            ..valid()
        };
        assert!(validate_new_joke(&boundary).is_ok());
    }

    #[test]
    fn test_all_errors_reported_together() {
        let joke = NewJoke {
            title: "   ".into(),
            setup: String::new(),
            punchline: "p".repeat(MAX_TEXT_CHARS + 1),
            estimated_time: Some(601),
            ..Default::default()
        };
        let DomainError::Validation(message) = validate_new_joke(&joke).unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(message.contains("Title is required"));
        assert!(message.contains("Setup is required"));
        assert!(message.contains("Punchline must be less than 5000 characters"));
        assert!(message.contains("between 0 and 600 seconds"));
    }

    #[test]
    fn test_changes_only_check_provided_fields() {
        assert!(validate_joke_changes(&JokeChanges::default()).is_ok());
        let changes = JokeChanges {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_joke_changes(&changes).is_err());
    }

    #[test]
    fn test_routine_validation() {
        assert!(validate_routine(Some("Open mic"), Some(3600)).is_ok());
        assert!(validate_routine(None, None).is_ok());
        assert!(validate_routine(Some(""), None).is_err());
        assert!(validate_routine(Some("Open mic"), Some(3601)).is_err());
    }
}
