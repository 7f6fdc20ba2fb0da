#![forbid(unsafe_code)]

//! Primitive channel payloads.
//!
//! Widgets exchange only strings, numbers, and booleans. [`Value`] makes that
//! rule a compile-time fact for typed callers; loosely-typed values arriving
//! from the outside (descriptors, persisted state) pass through the fallible
//! [`TryFrom<&serde_json::Value>`] conversion instead.
//!
//! The untagged serde representation keeps the wire form identical to the
//! underlying primitive: `"abc"`, `42`, `true`.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::ModelError;

/// A primitive value carried on a widget input/output channel.
///
/// The default value is the empty string, matching the default input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean payload.
    Bool(bool),
    /// Numeric payload. All numbers are carried as `f64`.
    Number(f64),
    /// Text payload.
    Text(String),
}

impl Default for Value {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Value {
    /// Whether this value is "falsy" in the export-reduction sense:
    /// the empty string, `0`, or `false`. Falsy values are omitted from the
    /// minimal serialized form.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Bool(b) => !b,
            Self::Number(n) => *n == 0.0,
            Self::Text(s) => s.is_empty(),
        }
    }

    /// Short type label for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Name of a JSON value's type, for diagnostics.
pub(crate) fn json_type_name(raw: &Json) -> &'static str {
    match raw {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

impl TryFrom<&Json> for Value {
    type Error = ModelError;

    /// Accepts only JSON primitives. Nulls, arrays, and objects are rejected;
    /// callers on broadcast/injection paths downgrade the rejection to a
    /// diagnostic and drop the write.
    fn try_from(raw: &Json) -> Result<Self, ModelError> {
        match raw {
            Json::Bool(b) => Ok(Self::Bool(*b)),
            Json::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or(ModelError::UnsupportedValue { found: "number" }),
            Json::String(s) => Ok(Self::Text(s.clone())),
            other => Err(ModelError::UnsupportedValue {
                found: json_type_name(other),
            }),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
