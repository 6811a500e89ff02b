//! Lenient numeric decoding for model output
//!
//! Models return scores as integers, floats, or occasionally strings. Everything that parses as
//! a number is rounded and clamped; anything else fails the decode.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Clamp any number into a 0-100 score
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

fn as_number<E: serde::de::Error>(value: &Value) -> Result<f64, E> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| E::custom("number out of range")),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| E::custom(format!("expected a number, got {:?}", s))),
        other => Err(E::custom(format!("expected a number, got {}", other))),
    }
}

/// Deserialize a 0-100 score
pub fn lenient<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_number::<D::Error>(&value).map(clamp_score)
}

/// Deserialize a list of 0-100 scores
pub fn lenient_vec<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    values
        .iter()
        .map(|v| as_number::<D::Error>(v).map(clamp_score))
        .collect()
}

/// Deserialize a non-negative count
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = as_number::<D::Error>(&value)?;
    if n.is_nan() || n <= 0.0 {
        return Ok(0);
    }
    Ok(n.round().min(u32::MAX as f64) as u32)
}
