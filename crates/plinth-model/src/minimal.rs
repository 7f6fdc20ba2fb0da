#![forbid(unsafe_code)]

//! Minimal export form of a workspace.
//!
//! The export reduction keeps only the information needed to rebuild a
//! workspace through canonicalization, yielding a stable, diffable encoding:
//!
//! - `value` is omitted when falsy (empty string, `0`, `false`);
//! - `shared` is omitted when `false`;
//! - `subscriptionState` is always present; the `subscriptions` list is
//!   carried only under `some`, where it is the authoritative filter.
//!
//! The reduction is one-way: re-importing and re-exporting reproduces the
//! same minimal encoding, but redundant default fields present in the
//! original raw structure are not preserved.
//!
//! # Wire format
//!
//! ```json
//! [[{
//!   "id": "slider-0",
//!   "type": "slider-widget",
//!   "label": "Volume",
//!   "inputs": {
//!     "volume": { "value": 0.5, "shared": true, "subscriptionState": "all" }
//!   }
//! }]]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;
use crate::widget::{Input, SubscriptionState, Widget, WidgetId};

/// A whole workspace in minimal form: columns of widgets, order-preserving.
pub type MinimalWorkspace = Vec<Vec<MinimalWidget>>;

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// One input channel, reduced to its non-default fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalInput {
    /// Channel value; omitted when falsy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Shared-parameter flag; omitted when false.
    #[serde(default, skip_serializing_if = "is_false")]
    pub shared: bool,
    /// Delivery policy. Always serialized; defaults to `all` when absent
    /// from hand-written input.
    #[serde(rename = "subscriptionState", default)]
    pub subscription_state: SubscriptionState,
    /// Explicit subscriber list; present only under `some`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<WidgetId>>,
}

/// A widget in minimal form. Identity fields are always retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalWidget {
    /// Workspace-unique identifier.
    pub id: WidgetId,
    /// Implementation kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display label.
    pub label: String,
    /// Reduced input channels; omitted when the widget has none.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub inputs: IndexMap<String, MinimalInput>,
}

impl From<&Input> for MinimalInput {
    fn from(input: &Input) -> Self {
        let (subscription_state, subscriptions) = match input.subscription_state {
            SubscriptionState::All => (SubscriptionState::All, Option::None),
            SubscriptionState::None => (SubscriptionState::None, Option::None),
            SubscriptionState::Some => (
                SubscriptionState::Some,
                Option::Some(input.subscriptions.clone()),
            ),
        };
        Self {
            value: (!input.value.is_falsy()).then(|| input.value.clone()),
            shared: input.shared,
            subscription_state,
            subscriptions,
        }
    }
}

impl From<&Widget> for MinimalWidget {
    fn from(widget: &Widget) -> Self {
        Self {
            id: widget.id.clone(),
            kind: widget.kind.clone(),
            label: widget.label.clone(),
            inputs: widget
                .inputs
                .iter()
                .map(|(key, input)| (key.clone(), MinimalInput::from(input)))
                .collect(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
