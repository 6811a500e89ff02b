//! Input Guardrail - Keeps free-text requests about comedy
//!
//! Deterministic keyword screen run before anything reaches the external model.
//! Lengths are measured in characters.

/// Any of these anywhere in the input rejects it
pub const OFF_TOPIC_KEYWORDS: &[&str] = &[
    "weather",
    "recipe",
    "medical",
    "legal",
    "financial advice",
    "how to cook",
    "stock market",
    "health diagnosis",
];

/// Long inputs need at least one of these
pub const COMEDY_KEYWORDS: &[&str] = &[
    "joke",
    "premise",
    "punchline",
    "setup",
    "funny",
    "laugh",
    "comedy",
    "standup",
    "routine",
    "tag",
    "callback",
    "crowd work",
    "act out",
    "topper",
];

/// Below this length inputs are accepted unless they hit the deny-list
pub const SHORT_INPUT_CHARS: usize = 20;

/// Above this length inputs must mention comedy
pub const LONG_INPUT_CHARS: usize = 100;

pub const OFF_TOPIC_MESSAGE: &str =
    "Please keep your request focused on comedy writing and joke development.";
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Please provide valid comedy content.";
pub const API_ERROR_MESSAGE: &str =
    "Sorry, there was an error communicating with the AI. Please try again.";
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please wait a moment and try again.";

/// Whether the input may be sent to the model
pub fn is_on_topic(input: &str) -> bool {
    let lower = input.to_lowercase();

    if OFF_TOPIC_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return false;
    }

    let length = input.chars().count();
    if length < SHORT_INPUT_CHARS {
        return true;
    }

    let mentions_comedy = COMEDY_KEYWORDS.iter().any(|k| lower.contains(k));
    !(length > LONG_INPUT_CHARS && !mentions_comedy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comedy_request_accepted() {
        assert!(is_on_topic("tell me a joke about airports"));
    }

    #[test]
    fn test_short_input_accepted() {
        assert!(is_on_topic("hi"));
        assert!(is_on_topic(""));
    }

    #[test]
    fn test_deny_list_wins_even_when_short() {
        assert!(!is_on_topic("weather?"));
        assert!(!is_on_topic("A joke about the STOCK MARKET"));
    }

    #[test]
    fn test_long_off_topic_rejected() {
        let text = "Please give me a turkey recipe with cranberry sauce, stuffing, gravy and \
                    roasted vegetables for twelve people this Thanksgiving, with timings for each";
        assert!(text.chars().count() > LONG_INPUT_CHARS);
        assert!(!is_on_topic(text));
    }

    #[test]
    fn test_long_input_without_comedy_words_rejected() {
        let text = "My uncle keeps buying garden gnomes and arranging them in elaborate scenes \
                    on his front lawn every single weekend, neighbours are confused";
        assert!(text.chars().count() > LONG_INPUT_CHARS);
        assert!(!is_on_topic(text));
    }

    #[test]
    fn test_long_input_with_comedy_words_accepted() {
        let text = "My uncle keeps buying garden gnomes and arranging them in elaborate scenes \
                    on his front lawn every weekend. Help me find the punchline in that.";
        assert!(text.chars().count() > LONG_INPUT_CHARS);
        assert!(is_on_topic(text));
    }

    #[test]
    fn test_medium_length_needs_no_comedy_words() {
        let text = "My uncle collects garden gnomes obsessively";
        let length = text.chars().count();
        assert!((SHORT_INPUT_CHARS..=LONG_INPUT_CHARS).contains(&length));
        assert!(is_on_topic(text));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let text = "é".repeat(60);
        assert!(text.len() > LONG_INPUT_CHARS);
        assert!(is_on_topic(&text));
    }
}
