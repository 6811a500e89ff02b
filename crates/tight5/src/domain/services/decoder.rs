//! Suggestion Decoder - Turns free-form model output into typed results
//!
//! Suggestion lists go through three stages: strict JSON, a line heuristic, then explicit
//! failure. Object results strip fences and fall back to the first balanced `{...}` block.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Upper bound for heuristic suggestion lists when the caller asks for a bounded quota
pub const HEURISTIC_LIMIT: usize = 5;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?\n?").expect("fence pattern is valid"));

static SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n•*]").expect("split pattern is valid"));

static DASH_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-–—]\s*").expect("dash pattern is valid"));

static NUMBER_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.):]\s*").expect("number pattern is valid"));

/// Why model output could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("model returned no usable content")]
    Empty,

    #[error("model returned malformed JSON: {0}")]
    Malformed(String),

    #[error("optimized order is not a permutation of the routine")]
    NotAPermutation,
}

/// Remove markdown code fences and surrounding whitespace
pub fn strip_fences(raw: &str) -> String {
    FENCE_RE.replace_all(raw, "").trim().to_string()
}

fn coerce(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn clean_list(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| coerce(v).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Items of a reply that parsed as JSON.
///
/// Accepts an array, an object wrapping exactly one array (`{"suggestions": [...]}`) or a bare
/// string. Any other JSON value is malformed rather than text for the line heuristic.
fn json_list(value: Value) -> Result<Vec<Value>, DecodeError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::String(s) => Ok(vec![Value::String(s)]),
        Value::Object(map) => {
            let mut arrays = map.into_iter().filter_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            });
            match (arrays.next(), arrays.next()) {
                (Some(items), None) => Ok(items),
                _ => Err(DecodeError::Malformed(
                    "expected an object wrapping a single array".to_string(),
                )),
            }
        }
        other => Err(DecodeError::Malformed(format!(
            "expected a JSON array, got {}",
            other
        ))),
    }
}

fn heuristic_list(text: &str, limit: Option<usize>) -> Vec<String> {
    let items = SPLIT_RE
        .split(text)
        .map(|line| {
            let line = DASH_MARKER_RE.replace(line.trim(), "");
            NUMBER_MARKER_RE.replace(&line, "").trim().to_string()
        })
        .filter(|line| !line.is_empty());

    match limit {
        Some(limit) => items.take(limit).collect(),
        None => items.collect(),
    }
}

/// Decode a suggestion list.
///
/// `limit` bounds the heuristic stage only; a well-formed JSON array is returned as the model
/// sent it. A JSON array with no non-blank entries is a failure, not a cue for the heuristic.
pub fn decode_suggestions(raw: &str, limit: Option<usize>) -> Result<Vec<String>, DecodeError> {
    let text = strip_fences(raw);
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        let items = clean_list(json_list(value)?);
        return if items.is_empty() {
            Err(DecodeError::Empty)
        } else {
            Ok(items)
        };
    }

    let items = heuristic_list(&text, limit);
    if items.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(items)
}

/// Byte range of the first balanced `{...}` block, ignoring braces inside strings
fn first_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode a typed object result
pub fn decode_object<T: DeserializeOwned>(raw: &str) -> Result<T, DecodeError> {
    let text = strip_fences(raw);
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    let direct = match serde_json::from_str::<T>(&text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    match first_object(&text) {
        Some(candidate) if candidate.len() < text.len() => {
            serde_json::from_str::<T>(candidate).map_err(|e| DecodeError::Malformed(e.to_string()))
        }
        _ => Err(DecodeError::Malformed(direct.to_string())),
    }
}

/// Check that `order` holds exactly the ids of `input`, each as many times as it appears there
pub fn ensure_permutation(order: &[String], input: &[String]) -> Result<(), DecodeError> {
    let mut a: Vec<&str> = order.iter().map(String::as_str).collect();
    let mut b: Vec<&str> = input.iter().map(String::as_str).collect();
    a.sort_unstable();
    b.sort_unstable();
    if a == b {
        Ok(())
    } else {
        Err(DecodeError::NotAPermutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_fenced_json_array() {
        let raw = "```json\n[\"a\",\"b\",\"c\"]\n```";
        assert_eq!(
            decode_suggestions(raw, Some(HEURISTIC_LIMIT)).unwrap(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_json_elements_are_coerced_and_cleaned() {
        let raw = r#"["  spaced  ", 42, "", "   ", true]"#;
        assert_eq!(
            decode_suggestions(raw, None).unwrap(),
            vec!["spaced", "42", "true"]
        );
    }

    #[test]
    fn test_json_array_is_not_capped() {
        let raw = r#"["1","2","3","4","5","6","7"]"#;
        assert_eq!(decode_suggestions(raw, Some(5)).unwrap().len(), 7);
    }

    #[test]
    fn test_wrapped_json_array() {
        let raw = r#"{"suggestions": ["one", "two"]}"#;
        assert_eq!(decode_suggestions(raw, None).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_bare_json_string_is_one_item() {
        assert_eq!(
            decode_suggestions("\"just one idea\"", Some(HEURISTIC_LIMIT)).unwrap(),
            vec!["just one idea"]
        );
        assert_eq!(decode_suggestions("\"  \"", None), Err(DecodeError::Empty));
    }

    #[test]
    fn test_json_without_a_list_is_malformed() {
        for raw in [
            r#"{"ideas": "a"}"#,
            r#"{"setups": ["a"], "punchlines": ["b"]}"#,
            "42",
            "null",
            "```json\n{\"ideas\": {\"first\": \"a\"}}\n```",
        ] {
            assert!(
                matches!(decode_suggestions(raw, Some(HEURISTIC_LIMIT)), Err(DecodeError::Malformed(_))),
                "{raw} should not decode"
            );
        }
    }

    #[test]
    fn test_blank_json_array_does_not_fall_through() {
        assert_eq!(decode_suggestions(r#"["", " "]"#, Some(HEURISTIC_LIMIT)), Err(DecodeError::Empty));
        assert_eq!(decode_suggestions(r#"{"suggestions": []}"#, None), Err(DecodeError::Empty));
    }

    #[test]
    fn test_numbered_and_dashed_lines() {
        let raw = "1. First idea\n2. Second idea\n- Third idea";
        assert_eq!(
            decode_suggestions(raw, Some(HEURISTIC_LIMIT)).unwrap(),
            vec!["First idea", "Second idea", "Third idea"]
        );
    }

    #[test]
    fn test_bullets_and_other_markers() {
        let raw = "Here you go:\n• Alpha\n* Beta\n3) Gamma\n4: Delta\n— Epsilon";
        assert_eq!(
            decode_suggestions(raw, None).unwrap(),
            vec!["Here you go:", "Alpha", "Beta", "Gamma", "Delta", "Epsilon"]
        );
    }

    #[test]
    fn test_heuristic_respects_limit() {
        let raw = "a\nb\nc\nd\ne\nf\ng";
        assert_eq!(decode_suggestions(raw, Some(HEURISTIC_LIMIT)).unwrap().len(), 5);
        assert_eq!(decode_suggestions(raw, None).unwrap().len(), 7);
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(decode_suggestions("", None), Err(DecodeError::Empty));
        assert_eq!(decode_suggestions("   \n\t ", None), Err(DecodeError::Empty));
        assert_eq!(decode_suggestions("```json\n```", None), Err(DecodeError::Empty));
        assert_eq!(decode_suggestions("- \n* \n1. ", None), Err(DecodeError::Empty));
        assert_eq!(decode_suggestions(r#"["", " "]"#, None), Err(DecodeError::Empty));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Improvement {
        setup: String,
        punchline: String,
    }

    #[test]
    fn test_decode_object_plain_and_fenced() {
        let plain = r#"{"setup": "s", "punchline": "p"}"#;
        let fenced = format!("```json\n{}\n```", plain);
        let expected = Improvement {
            setup: "s".to_string(),
            punchline: "p".to_string(),
        };
        assert_eq!(decode_object::<Improvement>(plain).unwrap(), expected);
        assert_eq!(decode_object::<Improvement>(&fenced).unwrap(), expected);
    }

    #[test]
    fn test_decode_object_with_surrounding_prose() {
        let raw = r#"Sure! Here's the rewrite: {"setup": "a {brace} inside", "punchline": "p"} Hope it helps."#;
        let decoded: Improvement = decode_object(raw).unwrap();
        assert_eq!(decoded.setup, "a {brace} inside");
    }

    #[test]
    fn test_decode_object_failures() {
        assert_eq!(decode_object::<Improvement>("  "), Err(DecodeError::Empty));
        assert!(matches!(
            decode_object::<Improvement>("no json here"),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_object::<Improvement>(r#"{"setup": "only"}"#),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_ensure_permutation() {
        let input: Vec<String> = vec!["a".into(), "b".into(), "a".into()];
        let good: Vec<String> = vec!["b".into(), "a".into(), "a".into()];
        let dropped: Vec<String> = vec!["b".into(), "a".into()];
        let invented: Vec<String> = vec!["b".into(), "a".into(), "z".into()];

        assert!(ensure_permutation(&good, &input).is_ok());
        assert_eq!(
            ensure_permutation(&dropped, &input),
            Err(DecodeError::NotAPermutation)
        );
        assert_eq!(
            ensure_permutation(&invented, &input),
            Err(DecodeError::NotAPermutation)
        );
    }
}
