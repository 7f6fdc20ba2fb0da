#![forbid(unsafe_code)]

//! Workspace export and direct state injection.
//!
//! [`WorkspaceStore::export_workspace`] produces the minimal serialized form:
//! a deep structural copy that never aliases live store memory, with every
//! input reduced to its non-default fields (see `plinth_model::minimal`).
//! Exporting is idempotent, and re-importing an export through
//! `set_workspace` reproduces the same minimal encoding.
//!
//! [`WorkspaceStore::inject_state`] is the restore side: it overwrites input
//! values directly, bypassing subscription broadcast. Entries targeting an
//! unknown widget or key, or carrying a non-primitive value, are skipped with
//! a diagnostic while the rest of the batch proceeds.

use plinth_model::{MinimalWidget, MinimalWorkspace, Value, WidgetId};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::warn;

use crate::store::{WorkspaceStore, find_widget_mut};
use crate::watch::WorkspaceEvent;

/// One persisted input value: which widget, which key, what value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Target widget id.
    #[serde(rename = "widgetId")]
    pub widget_id: WidgetId,
    /// Target input key.
    pub key: String,
    /// Value to restore. Must be a JSON primitive; anything else is skipped
    /// with a diagnostic at injection time.
    pub value: Json,
}

impl WorkspaceStore {
    /// Export the workspace in minimal form.
    ///
    /// The result is a deep copy: mutating the store afterwards does not
    /// affect it, and vice versa.
    #[must_use]
    pub fn export_workspace(&self) -> MinimalWorkspace {
        let state = self.state.borrow();
        state
            .columns
            .iter()
            .map(|column| column.iter().map(MinimalWidget::from).collect())
            .collect()
    }

    /// Overwrite input values from a batch of persisted entries.
    ///
    /// Each entry resolves independently; failures are diagnostics, not
    /// errors, and never stop the batch. Writes bypass the subscription
    /// router — this is a state restore, not an emission.
    pub fn inject_state(&self, entries: &[StateEntry]) {
        let mut written = 0usize;
        {
            let mut state = self.state.borrow_mut();
            for entry in entries {
                let value = match Value::try_from(&entry.value) {
                    Ok(value) => value,
                    Err(err) => {
                        warn!(
                            widget = %entry.widget_id,
                            key = %entry.key,
                            %err,
                            "skipping state entry"
                        );
                        continue;
                    }
                };
                let Some(widget) = find_widget_mut(&mut state, &entry.widget_id) else {
                    warn!(widget = %entry.widget_id, "state entry targets unknown widget; skipping");
                    continue;
                };
                match widget.inputs.get_mut(&entry.key) {
                    Some(input) => {
                        input.value = value;
                        written += 1;
                    }
                    None => warn!(
                        widget = %entry.widget_id,
                        key = %entry.key,
                        "state entry targets unknown input; skipping"
                    ),
                }
            }
            if written > 0 {
                state.revision += 1;
            }
        }
        if written > 0 {
            self.notify(WorkspaceEvent::ValueWritten);
        }
    }
}
