#![forbid(unsafe_code)]

//! The workspace store: the single source of truth for widget state.
//!
//! A workspace is an ordered sequence of columns, each an ordered sequence of
//! canonical widgets. Column order and in-column order are display positions
//! and are preserved by every operation that does not explicitly reorder.
//!
//! [`WorkspaceStore`] is a cheaply-clonable handle to shared interior state
//! (`Rc<RefCell<..>>`): clones see the same workspace, which is how input and
//! output handles stay live as the state mutates elsewhere. The store is
//! single-threaded by construction; every operation completes fully before
//! returning, with no interleaving mutation possible mid-operation.
//!
//! # Invariants
//!
//! 1. Every widget id is unique across all columns after any mutation.
//! 2. Removing a widget strips its id from every other widget's
//!    `subscriptions` list — no dangling subscriber references survive.
//! 3. A failed operation leaves the store unchanged.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashSet;
use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::debug;

use plinth_model::{
    DefaultLabels, Value, Widget, WidgetId, WidgetShape, canonicalize, with_unique_id,
};

use crate::error::{Result, StoreError};
use crate::watch::{WatchGuard, Watchers, WorkspaceEvent};

/// Interior state shared by every clone of a [`WorkspaceStore`].
pub(crate) struct StoreState {
    pub(crate) columns: Vec<Vec<Widget>>,
    pub(crate) labels: DefaultLabels,
    pub(crate) watchers: Watchers,
    pub(crate) revision: u64,
}

/// Handle to a workspace. Cloning shares the same underlying state.
pub struct WorkspaceStore {
    pub(crate) state: Rc<RefCell<StoreState>>,
}

// Manual Clone: shares the same Rc.
impl Clone for WorkspaceStore {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl Default for WorkspaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WorkspaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("WorkspaceStore")
            .field("columns", &state.columns.len())
            .field("widgets", &state.columns.iter().map(Vec::len).sum::<usize>())
            .field("revision", &state.revision)
            .finish()
    }
}

/// Locate a widget by id.
pub(crate) fn find_widget<'a>(state: &'a StoreState, id: &str) -> Option<&'a Widget> {
    state.columns.iter().flatten().find(|widget| widget.id == id)
}

/// Locate a widget by id, mutably.
pub(crate) fn find_widget_mut<'a>(state: &'a mut StoreState, id: &str) -> Option<&'a mut Widget> {
    state
        .columns
        .iter_mut()
        .flatten()
        .find(|widget| widget.id == id)
}

impl WorkspaceStore {
    /// Create an empty workspace with no default labels.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                columns: Vec::new(),
                labels: DefaultLabels::default(),
                watchers: Watchers::default(),
                revision: 0,
            })),
        }
    }

    /// Install the kind-to-label table used for defaulted widget labels.
    ///
    /// Expected to be set once, before widgets are added.
    pub fn set_default_labels(&self, labels: DefaultLabels) {
        self.state.borrow_mut().labels = labels;
    }

    /// Monotonic counter bumped on every committed mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    /// Register a watcher for workspace events. The callback stays registered
    /// until the returned guard is dropped.
    pub fn watch(&self, callback: impl Fn(&WorkspaceEvent) + 'static) -> WatchGuard {
        self.state.borrow_mut().watchers.register(callback)
    }

    /// Invoke live watchers with no store borrow held.
    pub(crate) fn notify(&self, event: WorkspaceEvent) {
        let live = self.state.borrow_mut().watchers.live();
        for callback in &live {
            callback(&event);
        }
    }

    // ── Structural mutation ─────────────────────────────────────────────

    /// Insert an empty column at `index`, shifting later columns right.
    /// An out-of-range index appends at the end.
    pub fn insert_column(&self, index: usize) {
        {
            let mut state = self.state.borrow_mut();
            let index = index.min(state.columns.len());
            state.columns.insert(index, Vec::new());
            state.revision += 1;
        }
        self.notify(WorkspaceEvent::Structure);
    }

    /// Remove the column at `index`, removing every widget in it first so
    /// subscription references to those widgets are scrubbed everywhere.
    ///
    /// # Errors
    ///
    /// [`StoreError::ColumnOutOfRange`] if `index` is not a current column.
    pub fn remove_column(&self, index: usize) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            let columns = state.columns.len();
            if index >= columns {
                return Err(StoreError::ColumnOutOfRange { index, columns });
            }
            let ids: Vec<WidgetId> = state.columns[index]
                .iter()
                .map(|widget| widget.id.clone())
                .collect();
            for id in &ids {
                remove_widget_inner(&mut state, id);
            }
            state.columns.remove(index);
            state.revision += 1;
            debug!(index, removed = ids.len(), "removed column");
        }
        self.notify(WorkspaceEvent::Structure);
        Ok(())
    }

    /// Canonicalize `raw`, assign it a unique id, and append it to the end of
    /// the column at `column`. Returns the assigned id.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidWidget`] for a malformed descriptor;
    /// [`StoreError::ColumnOutOfRange`] for a nonexistent target column.
    pub fn add_widget(&self, raw: &Json, column: usize) -> Result<WidgetId> {
        let id = {
            let mut state = self.state.borrow_mut();
            let columns = state.columns.len();
            if column >= columns {
                return Err(StoreError::ColumnOutOfRange { index: column, columns });
            }
            let widget = canonicalize(raw, &state.labels)?;
            let existing: AHashSet<WidgetId> = state
                .columns
                .iter()
                .flatten()
                .map(|widget| widget.id.clone())
                .collect();
            let widget = with_unique_id(widget, &existing);
            let id = widget.id.clone();
            state.columns[column].push(widget);
            state.revision += 1;
            debug!(%id, column, "added widget");
            id
        };
        self.notify(WorkspaceEvent::Structure);
        Ok(id)
    }

    /// Remove the widget with `id`, scrubbing it from every other widget's
    /// subscription list. Remaining widgets keep their relative order.
    ///
    /// # Errors
    ///
    /// [`StoreError::WidgetNotFound`] if no widget has that id.
    pub fn remove_widget(&self, id: &str) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            if !remove_widget_inner(&mut state, id) {
                return Err(StoreError::WidgetNotFound(id.to_owned()));
            }
            state.revision += 1;
            debug!(id, "removed widget");
        }
        self.notify(WorkspaceEvent::Structure);
        Ok(())
    }

    /// Move the widget with `id` to `row` within `column`. The row index is
    /// interpreted after removal and clamped to the column length; all other
    /// widgets keep their relative order.
    ///
    /// # Errors
    ///
    /// [`StoreError::WidgetNotFound`] if no widget has that id;
    /// [`StoreError::ColumnOutOfRange`] if the target column does not exist.
    pub fn move_widget(&self, id: &str, column: usize, row: usize) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            let columns = state.columns.len();
            if column >= columns {
                return Err(StoreError::ColumnOutOfRange { index: column, columns });
            }
            let Some((from_column, from_row)) = position_of(&state, id) else {
                return Err(StoreError::WidgetNotFound(id.to_owned()));
            };
            let widget = state.columns[from_column].remove(from_row);
            let row = row.min(state.columns[column].len());
            state.columns[column].insert(row, widget);
            state.revision += 1;
            debug!(id, column, row, "moved widget");
        }
        self.notify(WorkspaceEvent::Structure);
        Ok(())
    }

    /// Replace the whole workspace from a raw array-of-arrays of descriptors.
    ///
    /// Widgets are canonicalized and assigned ids in column-major then
    /// row-major order, scanned against the ids already assigned earlier in
    /// the same batch, so numbering is deterministic for a given input. The
    /// swap is all-or-nothing: on any error the store is untouched. No widget
    /// from the old state persists into the new one, even when ids coincide.
    ///
    /// Watchers observe [`WorkspaceEvent::Cleared`] while the store is empty,
    /// then [`WorkspaceEvent::Structure`] once the new state is committed.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidShape`] if `raw` is not an array of arrays of
    /// objects; [`StoreError::InvalidWidget`] if any descriptor fails
    /// canonicalization.
    pub fn set_workspace(&self, raw: &Json) -> Result<()> {
        let labels = self.state.borrow().labels.clone();

        let raw_columns = raw
            .as_array()
            .ok_or_else(|| StoreError::InvalidShape("workspace is not an array".to_owned()))?;

        let mut assigned: AHashSet<WidgetId> = AHashSet::new();
        let mut columns: Vec<Vec<Widget>> = Vec::with_capacity(raw_columns.len());
        for (column_index, raw_column) in raw_columns.iter().enumerate() {
            let raw_widgets = raw_column.as_array().ok_or_else(|| {
                StoreError::InvalidShape(format!("column {column_index} is not an array"))
            })?;
            let mut column = Vec::with_capacity(raw_widgets.len());
            for (row_index, raw_widget) in raw_widgets.iter().enumerate() {
                if !raw_widget.is_object() {
                    return Err(StoreError::InvalidShape(format!(
                        "entry at column {column_index}, row {row_index} is not an object"
                    )));
                }
                let widget = canonicalize(raw_widget, &labels)?;
                let widget = with_unique_id(widget, &assigned);
                assigned.insert(widget.id.clone());
                column.push(widget);
            }
            columns.push(column);
        }

        // Two-phase commit: make the empty state observable first so display
        // layers rebuild instead of diffing across the replacement.
        {
            let mut state = self.state.borrow_mut();
            state.columns = Vec::new();
            state.revision += 1;
        }
        self.notify(WorkspaceEvent::Cleared);
        {
            let mut state = self.state.borrow_mut();
            state.columns = columns;
            state.revision += 1;
            debug!(widgets = assigned.len(), revision = state.revision, "workspace replaced");
        }
        self.notify(WorkspaceEvent::Structure);
        Ok(())
    }

    // ── Derived views ───────────────────────────────────────────────────

    /// Display-safe projection of the workspace: id, kind, and label only.
    #[must_use]
    pub fn shape(&self) -> Vec<Vec<WidgetShape>> {
        let state = self.state.borrow();
        state
            .columns
            .iter()
            .map(|column| column.iter().map(WidgetShape::from).collect())
            .collect()
    }

    /// Every widget id, column-major then row-major.
    #[must_use]
    pub fn widget_ids(&self) -> Vec<WidgetId> {
        let state = self.state.borrow();
        state
            .columns
            .iter()
            .flatten()
            .map(|widget| widget.id.clone())
            .collect()
    }

    /// Snapshot of every widget, column-major then row-major.
    #[must_use]
    pub fn widgets(&self) -> Vec<Widget> {
        let state = self.state.borrow();
        state.columns.iter().flatten().cloned().collect()
    }

    /// Snapshot of the widget with `id`.
    ///
    /// # Errors
    ///
    /// [`StoreError::WidgetNotFound`] if no widget has that id.
    pub fn get_widget(&self, id: &str) -> Result<Widget> {
        let state = self.state.borrow();
        find_widget(&state, id)
            .cloned()
            .ok_or_else(|| StoreError::WidgetNotFound(id.to_owned()))
    }

    /// Whether a widget with `id` exists.
    #[must_use]
    pub fn contains_widget(&self, id: &str) -> bool {
        find_widget(&self.state.borrow(), id).is_some()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.state.borrow().columns.len()
    }

    /// Total number of widgets across all columns.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.state.borrow().columns.iter().map(Vec::len).sum()
    }

    /// Flat `"<widgetId>.<key>"` → value mapping over every input flagged
    /// `shared`, regardless of subscription state. Iteration order follows
    /// widget order, then each widget's input declaration order.
    #[must_use]
    pub fn shared_parameters(&self) -> IndexMap<String, Value> {
        let state = self.state.borrow();
        let mut shared = IndexMap::new();
        for widget in state.columns.iter().flatten() {
            for (key, input) in &widget.inputs {
                if input.shared {
                    shared.insert(format!("{}.{key}", widget.id), input.value.clone());
                }
            }
        }
        shared
    }
}

/// (column, row) position of a widget.
fn position_of(state: &StoreState, id: &str) -> Option<(usize, usize)> {
    state.columns.iter().enumerate().find_map(|(column_index, column)| {
        column
            .iter()
            .position(|widget| widget.id == id)
            .map(|row_index| (column_index, row_index))
    })
}

/// Scrub `id` from every subscription list, then drop the widget itself.
/// Returns false when no widget had that id.
pub(crate) fn remove_widget_inner(state: &mut StoreState, id: &str) -> bool {
    if find_widget(state, id).is_none() {
        return false;
    }
    for widget in state.columns.iter_mut().flatten() {
        for input in widget.inputs.values_mut() {
            input.subscriptions.retain(|subscriber| subscriber != id);
        }
    }
    for column in &mut state.columns {
        column.retain(|widget| widget.id != id);
    }
    true
}
