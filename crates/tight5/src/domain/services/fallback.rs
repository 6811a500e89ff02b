//! Local fallback suggestions for when the model is unavailable
//!
//! Deterministic templates over the user's own text. Only suggestion-list tasks have one.

use crate::domain::entities::AssistantTask;

use super::prompts::sanitize_fragment;

/// Longest user fragment echoed back, in words
const MAX_ECHO_WORDS: usize = 12;

fn echo(text: &str) -> String {
    let cleaned = sanitize_fragment(text);
    let words: Vec<&str> = cleaned.split_whitespace().take(MAX_ECHO_WORDS).collect();
    words
        .join(" ")
        .trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '\'')
        .to_string()
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Suggestions for `task`, or `None` when the task has no local fallback
pub fn suggestions(task: &AssistantTask) -> Option<Vec<String>> {
    match task {
        AssistantTask::SetupGeneration { premise } => {
            let topic = lowercase_first(&echo(premise));
            Some(vec![
                format!("You ever notice how {}?", topic),
                format!("So I've been thinking a lot about {} lately.", topic),
                format!("Nobody warns you about {}.", topic),
            ])
        }
        AssistantTask::PunchlineGeneration { setup } => {
            let topic = lowercase_first(&echo(setup));
            Some(vec![
                "Which is exactly how my therapist describes me.".to_string(),
                format!("And somehow that's still better than {}.", topic),
                "My mom calls that a cry for help. I call it Tuesday.".to_string(),
                "I'm not saying it's a scam. I'm saying the receipt is in Comic Sans.".to_string(),
                "Turns out that's not a personality. That's a warning label.".to_string(),
            ])
        }
        AssistantTask::StructurePart {
            premise,
            template,
            part_id,
            ..
        } => {
            let topic = lowercase_first(&echo(premise));
            let label = template
                .part(part_id)
                .map(|p| p.label.to_lowercase())
                .unwrap_or_else(|| "next beat".to_string());
            Some(vec![
                format!("The obvious {} about {}.", label, topic),
                format!("The honest {} about {}, the one you'd only tell friends.", label, topic),
                format!("The {} about {} that goes one step too far.", label, topic),
            ])
        }
        AssistantTask::TagSuggestion { punchline, .. } => {
            let topic = lowercase_first(&echo(punchline));
            Some(vec![
                "And that's the good version.".to_string(),
                "I wish I was kidding.".to_string(),
                format!("Which, to be fair, is also how I'd describe {}.", topic),
            ])
        }
        _ => None,
    }
}
