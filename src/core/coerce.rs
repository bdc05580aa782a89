//! Recovery of structured JSON from free-form model output.
//!
//! Strategies run in order and the first one that yields a JSON object or
//! array wins:
//! 1. the whole text
//! 2. the body of a ``` fence (optionally tagged `json`)
//! 3. the span from the first `{` to the last `}`
//!
//! Bare scalars never count as a result, so prose such as `true` or `42`
//! fails the same way as text with no JSON at all.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
#[error("Failed to parse AI response")]
pub struct CoerceError {
    /// Leading part of the text that could not be parsed, for logs.
    pub excerpt: String,
}

impl CoerceError {
    fn new(text: &str) -> Self {
        Self {
            excerpt: crate::core::llm::truncate(text.trim(), 200),
        }
    }
}

/// Body of the first fenced code block, if it is non-empty.
pub fn extract_fenced(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_ticks = &text[start + 3..];
    // Skip the info string (`json`, `JSON`, ...) up to the end of the line.
    let body_start = match after_ticks.find('\n') {
        Some(nl) if after_ticks[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => nl + 1,
        _ => after_ticks
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .count(),
    };
    let body = &after_ticks[body_start..];
    let end = body.find("```")?;
    let block = body[..end].trim();
    if block.is_empty() { None } else { Some(block) }
}

/// Span from the first `{` to the last `}` inclusive.
pub fn extract_braced(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

fn parse_structured(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(v @ (Value::Object(_) | Value::Array(_))) => Some(v),
        _ => None,
    }
}

/// Parses model output into a JSON object or array, failing closed.
pub fn parse_model_json(text: &str) -> Result<Value, CoerceError> {
    parse_structured(text)
        .or_else(|| extract_fenced(text).and_then(parse_structured))
        .or_else(|| extract_braced(text).and_then(parse_structured))
        .ok_or_else(|| CoerceError::new(text))
}

/// [`parse_model_json`] followed by a typed deserialize.
pub fn parse_model_as<T: DeserializeOwned>(text: &str) -> Result<T, CoerceError> {
    let value = parse_model_json(text)?;
    serde_json::from_value(value).map_err(|_| CoerceError::new(text))
}

/// Parsed object when recoverable, otherwise `{ <key>: <raw text> }`.
pub fn parse_or_wrap(text: &str, key: &str) -> Value {
    match parse_model_json(text) {
        Ok(value) => value,
        Err(_) => {
            let mut map = Map::new();
            map.insert(key.to_string(), Value::String(text.trim().to_string()));
            Value::Object(map)
        }
    }
}
