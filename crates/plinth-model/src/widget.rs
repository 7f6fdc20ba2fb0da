#![forbid(unsafe_code)]

//! Canonical widget and input types.
//!
//! A [`Widget`] is the atomic unit of the workspace: a stable identity, a
//! `kind` naming its implementation, a display label, and a map of named
//! input channels. The input map preserves insertion order so derived views
//! and exports stay deterministic for a given construction order.
//!
//! # Invariants
//!
//! 1. `kind` is a non-empty string (enforced at canonicalization).
//! 2. `subscription_state` governs broadcast delivery; the `subscriptions`
//!    list is authoritative only under [`SubscriptionState::Some`], but is
//!    retained under the other states for future transitions.

use ahash::AHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Unique widget identifier, stable once assigned.
pub type WidgetId = String;

/// Process-wide table mapping widget kind to its default display label.
pub type DefaultLabels = AHashMap<String, String>;

/// Broadcast delivery policy for one input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    /// Every other widget with a matching key receives broadcasts.
    #[default]
    All,
    /// No widget receives broadcasts on this key.
    None,
    /// Only widgets listed in `subscriptions` receive broadcasts.
    Some,
}

impl SubscriptionState {
    /// Parse the serialized keyword form (`all` / `none` / `some`).
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "all" => Option::Some(Self::All),
            "none" => Option::Some(Self::None),
            "some" => Option::Some(Self::Some),
            _ => Option::None,
        }
    }

    /// The serialized keyword form.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::None => "none",
            Self::Some => "some",
        }
    }
}

/// One named channel on a widget, in fully-defaulted canonical form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Input {
    /// Current channel value.
    pub value: Value,
    /// Whether this channel is part of the shared-parameters projection.
    pub shared: bool,
    /// Explicitly listed subscriber widget ids, in declaration order.
    pub subscriptions: Vec<WidgetId>,
    /// Delivery policy for broadcasts on this key.
    pub subscription_state: SubscriptionState,
}

/// A canonical widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    /// Workspace-unique identifier. Empty only between canonicalization and
    /// identifier assignment.
    pub id: WidgetId,
    /// Implementation kind. Never empty. Serialized as `type`.
    pub kind: String,
    /// Display label.
    pub label: String,
    /// Named input channels, insertion-ordered.
    pub inputs: IndexMap<String, Input>,
}

/// Display-safe projection of a widget: identity only, no input wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetShape {
    /// Widget identifier.
    pub id: WidgetId,
    /// Implementation kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display label.
    pub label: String,
}

impl From<&Widget> for WidgetShape {
    fn from(widget: &Widget) -> Self {
        Self {
            id: widget.id.clone(),
            kind: widget.kind.clone(),
            label: widget.label.clone(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_state_keywords_round_trip() {
        for state in [
            SubscriptionState::All,
            SubscriptionState::None,
            SubscriptionState::Some,
        ] {
            assert_eq!(SubscriptionState::from_keyword(state.keyword()), Option::Some(state));
        }
        assert_eq!(SubscriptionState::from_keyword("sometimes"), Option::None);
        assert_eq!(SubscriptionState::from_keyword("ALL"), Option::None);
    }

    #[test]
    fn subscription_state_serde_form() {
        let json = serde_json::to_string(&SubscriptionState::Some).unwrap();
        assert_eq!(json, "\"some\"");
        let back: SubscriptionState = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(back, SubscriptionState::None);
    }

    #[test]
    fn default_input_record() {
        let input = Input::default();
        assert_eq!(input.value, Value::default());
        assert!(!input.shared);
        assert!(input.subscriptions.is_empty());
        assert_eq!(input.subscription_state, SubscriptionState::All);
    }

    #[test]
    fn shape_strips_inputs() {
        let widget = Widget {
            id: "text-0".into(),
            kind: "text-widget".into(),
            label: "Text".into(),
            inputs: IndexMap::from([("body".to_owned(), Input::default())]),
        };
        let shape = WidgetShape::from(&widget);
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "text-0", "type": "text-widget", "label": "Text"})
        );
    }
}
