//! Heuristic cleanup for model output that is supposed to be JSON.
//!
//! Models wrap JSON in markdown fences, prepend prose, or leave trailing commas.
//! `parse_lenient` applies one round of repair before giving up.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Error, PartialEq)]
pub enum RepairError {
    #[error("Failed to parse AI response. AI returned: {preview}...")]
    Unparseable { preview: String },

    #[error("AI response is not {expected}")]
    WrongShape { expected: &'static str },
}

/// Top-level JSON type the caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    fn pattern(self) -> &'static Regex {
        static ARRAY: OnceLock<Regex> = OnceLock::new();
        static OBJECT: OnceLock<Regex> = OnceLock::new();
        match self {
            JsonShape::Array => ARRAY.get_or_init(|| compile(r"(?s)\[.*\]")),
            JsonShape::Object => OBJECT.get_or_init(|| compile(r"(?s)\{.*\}")),
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            JsonShape::Array => value.is_array(),
            JsonShape::Object => value.is_object(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            JsonShape::Array => "an array",
            JsonShape::Object => "an object",
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in regex {pattern}: {e}"))
}

fn fence_re() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| compile(r"(?i)```(?:json)?\n?"))
}

fn trailing_comma_re() -> &'static Regex {
    static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();
    TRAILING_COMMA.get_or_init(|| compile(r",(\s*[}\]])"))
}

/// Removes every ```json / ``` marker (with an optional trailing newline) and trims.
pub fn strip_json_fences(text: &str) -> String {
    fence_re().replace_all(text, "").trim().to_string()
}

/// Drops commas that directly precede a closing bracket or brace.
pub fn remove_trailing_commas(text: &str) -> String {
    trailing_comma_re().replace_all(text, "$1").into_owned()
}

/// Parses model output as JSON of the given shape, with one repair attempt.
pub fn parse_lenient(raw: &str, shape: JsonShape) -> Result<Value, RepairError> {
    let stripped = strip_json_fences(raw);
    let candidate = shape
        .pattern()
        .find(&stripped)
        .map(|m| m.as_str())
        .unwrap_or(&stripped);

    let value = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => value,
        Err(first) => {
            tracing::warn!("AI response is not valid JSON ({first}), attempting repair");
            serde_json::from_str::<Value>(&remove_trailing_commas(candidate)).map_err(|_| {
                RepairError::Unparseable {
                    preview: candidate.chars().take(PREVIEW_CHARS).collect(),
                }
            })?
        }
    };

    if !shape.matches(&value) {
        return Err(RepairError::WrongShape {
            expected: shape.describe(),
        });
    }
    Ok(value)
}

/// Numeric value of a JSON number or of a string holding one (`0.9`, `"0.9"`, `" 72 "`).
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// `deserialize_with` helper for model-supplied numbers that sometimes arrive quoted.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    number_from_value(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a number or numeric string, got {value}")))
}
