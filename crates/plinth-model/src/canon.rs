#![forbid(unsafe_code)]

//! Canonicalization of loosely-typed widget descriptors.
//!
//! The presentation layer hands the engine plain JSON objects. This module
//! turns them into fully-defaulted [`Widget`]s:
//!
//! 1. `type` is required and must be a non-empty string — anything else is a
//!    hard [`ModelError::MissingType`].
//! 2. `id` passes through when it is a string, else the empty string, which
//!    signals "needs allocation" to the caller.
//! 3. `label` falls back to the default-label table, then to the kind itself.
//! 4. Each raw input entry is merged field-by-field over the default input
//!    record. Non-primitive input values are dropped with a diagnostic
//!    rather than failing the whole widget.
//!
//! Canonicalization is pure: it never reads or writes workspace state.

use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::warn;

use crate::error::{ModelError, Result};
use crate::value::Value;
use crate::widget::{DefaultLabels, Input, SubscriptionState, Widget, WidgetId};

/// Convert a raw descriptor into a canonical [`Widget`].
///
/// # Errors
///
/// [`ModelError::MissingType`] if the descriptor is not an object, has no
/// `type` field, or the field is not a non-empty string.
pub fn canonicalize(raw: &Json, labels: &DefaultLabels) -> Result<Widget> {
    let fields = raw.as_object().ok_or(ModelError::MissingType)?;
    let kind = fields
        .get("type")
        .and_then(Json::as_str)
        .filter(|kind| !kind.is_empty())
        .ok_or(ModelError::MissingType)?;

    let id = fields
        .get("id")
        .and_then(Json::as_str)
        .unwrap_or_default()
        .to_owned();

    let label = fields
        .get("label")
        .and_then(Json::as_str)
        .filter(|label| !label.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| {
            labels
                .get(kind)
                .cloned()
                .unwrap_or_else(|| kind.to_owned())
        });

    let inputs = match fields.get("inputs").and_then(Json::as_object) {
        Option::Some(raw_inputs) => raw_inputs
            .iter()
            .map(|(key, entry)| (key.clone(), canonicalize_input(key, entry)))
            .collect(),
        Option::None => IndexMap::new(),
    };

    Ok(Widget {
        id,
        kind: kind.to_owned(),
        label,
        inputs,
    })
}

/// Merge one raw input entry over the default input record.
fn canonicalize_input(key: &str, entry: &Json) -> Input {
    let Option::Some(fields) = entry.as_object() else {
        // A non-object entry carries no usable fields; everything defaults.
        return Input::default();
    };

    let subscriptions: Vec<WidgetId> = fields
        .get("subscriptions")
        .and_then(Json::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Json::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    // An explicit state wins; otherwise derive it from the supplied list.
    let derived = if subscriptions.is_empty() {
        SubscriptionState::All
    } else {
        SubscriptionState::Some
    };
    let subscription_state = fields
        .get("subscriptionState")
        .and_then(Json::as_str)
        .and_then(SubscriptionState::from_keyword)
        .unwrap_or(derived);

    let value = match fields.get("value") {
        Option::None => Value::default(),
        Option::Some(raw_value) => match Value::try_from(raw_value) {
            Ok(value) => value,
            Err(err) => {
                warn!(input = key, %err, "dropping unsupported input value");
                Value::default()
            }
        },
    };

    let shared = fields.get("shared").and_then(Json::as_bool).unwrap_or(false);

    Input {
        value,
        shared,
        subscriptions,
        subscription_state,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
