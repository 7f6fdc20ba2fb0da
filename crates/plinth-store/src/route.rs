#![forbid(unsafe_code)]

//! Subscription routing: who receives a broadcast, and the broadcast itself.
//!
//! A widget subscribes to a key by holding an input under that key; the
//! input's `subscription_state` decides delivery: `all` receives from every
//! emitter, `none` from nobody, `some` only from emitters in its
//! `subscriptions` list. The emitting widget is always excluded from its own
//! broadcast — that is the single self-exclusion rule, and it lives in
//! [`subscriber_ids`] only.
//!
//! Broadcast is synchronous and total: every eligible subscriber is updated
//! before [`WorkspaceStore::emit`] returns. A subscriber that matched the
//! query but lost the input before delivery is a configuration mismatch:
//! logged and skipped, never an error, so one misconfigured widget cannot
//! block delivery to the rest.

use plinth_model::{SubscriptionState, Value, WidgetId};
use tracing::warn;

use crate::store::{StoreState, WorkspaceStore, find_widget_mut};
use crate::watch::WorkspaceEvent;

/// Ids of every widget eligible to receive a broadcast from `source` on `key`.
pub(crate) fn subscriber_ids(state: &StoreState, source: &str, key: &str) -> Vec<WidgetId> {
    state
        .columns
        .iter()
        .flatten()
        .filter(|widget| widget.id != source)
        .filter(|widget| match widget.inputs.get(key) {
            Some(input) => match input.subscription_state {
                SubscriptionState::All => true,
                SubscriptionState::None => false,
                SubscriptionState::Some => {
                    input.subscriptions.iter().any(|subscriber| subscriber == source)
                }
            },
            None => false,
        })
        .map(|widget| widget.id.clone())
        .collect()
}

impl WorkspaceStore {
    /// Ids of the widgets that would receive a broadcast from `source` on
    /// `key`, excluding `source` itself.
    #[must_use]
    pub fn subscribers_of(&self, source: &str, key: &str) -> Vec<WidgetId> {
        subscriber_ids(&self.state.borrow(), source, key)
    }

    /// Broadcast `value` from `source` on `key`, writing it into the `key`
    /// input of every eligible subscriber.
    pub fn emit(&self, source: &str, key: &str, value: impl Into<Value>) {
        let value = value.into();
        let mut delivered = 0usize;
        {
            let mut state = self.state.borrow_mut();
            let targets = subscriber_ids(&state, source, key);
            for id in &targets {
                // A matched subscriber missing the input under `key` is a
                // configuration mismatch, not a fault.
                match find_widget_mut(&mut state, id).and_then(|widget| widget.inputs.get_mut(key))
                {
                    Some(input) => {
                        input.value = value.clone();
                        delivered += 1;
                    }
                    None => warn!(
                        widget = %id,
                        key,
                        "subscriber has no input under the broadcast key; skipping"
                    ),
                }
            }
            if delivered > 0 {
                state.revision += 1;
            }
        }
        if delivered > 0 {
            self.notify(WorkspaceEvent::ValueWritten);
        }
    }
}
