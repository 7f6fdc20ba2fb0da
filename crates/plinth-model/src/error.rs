#![forbid(unsafe_code)]

//! Model-level error types.
//!
//! Structural violations in a descriptor are hard failures surfaced to the
//! caller; they must never partially corrupt a workspace. Data-quality
//! problems on individual values are handled at the call site (usually by
//! dropping the value with a diagnostic), so [`ModelError::UnsupportedValue`]
//! only becomes a hard error where a primitive is strictly required.

use std::fmt;

/// Errors produced while canonicalizing descriptors or converting values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The raw descriptor has no `type` field, or it is not a non-empty string.
    MissingType,
    /// A channel value was not a supported primitive (string, number, boolean).
    UnsupportedValue {
        /// JSON type name of the offending value, for diagnostics.
        found: &'static str,
    },
}

/// Standard result type for model APIs.
pub type Result<T> = std::result::Result<T, ModelError>;

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingType => {
                write!(f, "widget descriptor is missing a `type` or it is not a string")
            }
            Self::UnsupportedValue { found } => write!(
                f,
                "unsupported value: expected string, number, or boolean, found {found}"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_type_display() {
        let err = ModelError::MissingType;
        assert!(format!("{err}").contains("`type`"));
    }

    #[test]
    fn unsupported_value_names_json_type() {
        let err = ModelError::UnsupportedValue { found: "array" };
        assert!(format!("{err}").contains("array"));
    }
}
