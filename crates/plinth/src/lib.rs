#![forbid(unsafe_code)]

//! Public facade for the Plinth widget workspace engine.
//!
//! Plinth manages the state of a composable widget workspace: a grid of
//! columns of widgets that exchange primitive values through a declarative
//! publish/subscribe mechanism, can be exported to and restored from a
//! compact serialized form, and can be mutated incrementally while preserving
//! identity invariants. Rendering is somebody else's problem: the display
//! layer feeds descriptors in and observes values out.
//!
//! Most applications only need the [`prelude`]:
//!
//! ```
//! use plinth::prelude::*;
//! use serde_json::json;
//!
//! let store = WorkspaceStore::new();
//! store.insert_column(0);
//! let id = store.add_widget(&json!({"type": "slider-widget"}), 0).unwrap();
//! assert_eq!(id, "slider-0");
//! ```

pub use plinth_model as model;
pub use plinth_store as store;

pub use plinth_model::{
    DefaultLabels, Input, MinimalInput, MinimalWidget, MinimalWorkspace, ModelError,
    SubscriptionState, Value, Widget, WidgetId, WidgetShape, canonicalize, with_unique_id,
};
pub use plinth_store::{
    InputHandle, InputOptions, OutputHandle, StateEntry, StoreError, WatchGuard, WorkspaceEvent,
    WorkspaceStore,
};

/// The commonly-used surface in one import.
pub mod prelude {
    pub use plinth_model::{
        DefaultLabels, SubscriptionState, Value, Widget, WidgetId, WidgetShape,
    };
    pub use plinth_store::{
        InputHandle, InputOptions, OutputHandle, StateEntry, StoreError, WorkspaceEvent,
        WorkspaceStore,
    };
}
