#![forbid(unsafe_code)]

//! Store-level error types.
//!
//! Structural violations (bad import shape, unknown widget id, bad
//! descriptor) are hard failures: they indicate a caller-side contract
//! violation and must leave the store unchanged. Data-quality problems during
//! broadcast and state injection are deliberately *not* represented here —
//! those are downgraded to `tracing` diagnostics so one misconfigured widget
//! cannot block delivery to the rest.

use std::fmt;

use plinth_model::{ModelError, WidgetId};

/// Errors produced by workspace store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A raw widget descriptor failed canonicalization.
    InvalidWidget(ModelError),
    /// A bulk import was not an array of arrays of objects.
    InvalidShape(String),
    /// An operation referenced a widget id absent from the store.
    WidgetNotFound(WidgetId),
    /// An operation referenced a column index outside the workspace.
    ColumnOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of columns at the time of the call.
        columns: usize,
    },
}

/// Standard result type for store APIs.
pub type Result<T> = std::result::Result<T, StoreError>;

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWidget(err) => write!(f, "{err}"),
            Self::InvalidShape(detail) => write!(f, "invalid workspace shape: {detail}"),
            Self::WidgetNotFound(id) => write!(f, "widget with id \"{id}\" not found"),
            Self::ColumnOutOfRange { index, columns } => {
                write!(f, "column index {index} out of range for {columns} columns")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidWidget(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        Self::InvalidWidget(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
