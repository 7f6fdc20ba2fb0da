#![forbid(unsafe_code)]

//! Live input and output handles bound to one (widget, key) pair.
//!
//! Handles hold a clone of the store and defer every read and write through
//! the widget id, so they stay valid as the slot mutates elsewhere — and
//! degrade gracefully (default reads, warn-and-skip writes) if the widget is
//! removed after the handle was created.
//!
//! Writes through an [`InputHandle`] update the slot in place without
//! broadcasting; an [`OutputHandle`] is the broadcast side and resolves its
//! subscriber set at send time.

use plinth_model::{Input, Value, WidgetId};
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::store::{WorkspaceStore, find_widget, find_widget_mut};
use crate::watch::WorkspaceEvent;

/// Options for [`WorkspaceStore::request_input`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InputOptions {
    /// Flag the lazily-created input as a shared parameter.
    pub shared: bool,
}

/// Two-way-bound view of one input slot.
pub struct InputHandle {
    store: WorkspaceStore,
    widget_id: WidgetId,
    key: String,
}

/// Bound emitter for one (widget, key) output channel.
pub struct OutputHandle {
    store: WorkspaceStore,
    widget_id: WidgetId,
    key: String,
}

impl WorkspaceStore {
    /// Obtain a live handle to the `key` input of widget `widget_id`,
    /// creating the input with defaults if the widget does not have it yet.
    ///
    /// # Errors
    ///
    /// [`StoreError::WidgetNotFound`] if the widget does not exist.
    pub fn request_input(
        &self,
        widget_id: &str,
        key: &str,
        options: InputOptions,
    ) -> Result<InputHandle> {
        {
            let mut state = self.state.borrow_mut();
            let widget = find_widget_mut(&mut state, widget_id)
                .ok_or_else(|| StoreError::WidgetNotFound(widget_id.to_owned()))?;
            widget.inputs.entry(key.to_owned()).or_insert_with(|| Input {
                shared: options.shared,
                ..Input::default()
            });
        }
        Ok(InputHandle {
            store: self.clone(),
            widget_id: widget_id.to_owned(),
            key: key.to_owned(),
        })
    }

    /// Obtain a bound emitter for the `key` output of widget `widget_id`.
    ///
    /// Creation is infallible; subscribers are resolved at send time, so a
    /// handle created before its widget (or any subscriber) exists works once
    /// they do.
    #[must_use]
    pub fn output(&self, widget_id: &str, key: &str) -> OutputHandle {
        OutputHandle {
            store: self.clone(),
            widget_id: widget_id.to_owned(),
            key: key.to_owned(),
        }
    }
}

impl InputHandle {
    /// Current value of the bound slot. Returns the default value when the
    /// widget or input no longer exists.
    #[must_use]
    pub fn get(&self) -> Value {
        let state = self.store.state.borrow();
        find_widget(&state, &self.widget_id)
            .and_then(|widget| widget.inputs.get(&self.key))
            .map(|input| input.value.clone())
            .unwrap_or_default()
    }

    /// Write a value into the bound slot, without broadcasting. The write is
    /// visible to anything reading the store directly, including the
    /// shared-parameters projection. Dropped with a diagnostic if the slot no
    /// longer exists.
    pub fn set(&self, value: impl Into<Value>) {
        let written = {
            let mut state = self.store.state.borrow_mut();
            match find_widget_mut(&mut state, &self.widget_id)
                .and_then(|widget| widget.inputs.get_mut(&self.key))
            {
                Some(input) => {
                    input.value = value.into();
                    state.revision += 1;
                    true
                }
                None => {
                    warn!(
                        widget = %self.widget_id,
                        key = %self.key,
                        "input slot no longer exists; dropping write"
                    );
                    false
                }
            }
        };
        if written {
            self.store.notify(WorkspaceEvent::ValueWritten);
        }
    }

    /// Id of the widget this handle is bound to.
    #[must_use]
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    /// Input key this handle is bound to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl OutputHandle {
    /// Broadcast `value` to every subscriber of this widget's `key` output.
    pub fn send(&self, value: impl Into<Value>) {
        self.store.emit(&self.widget_id, &self.key, value);
    }

    /// Id of the widget this handle emits for.
    #[must_use]
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    /// Output key this handle emits on.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for InputHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputHandle")
            .field("widget_id", &self.widget_id)
            .field("key", &self.key)
            .finish()
    }
}

impl std::fmt::Debug for OutputHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputHandle")
            .field("widget_id", &self.widget_id)
            .field("key", &self.key)
            .finish()
    }
}
