#![forbid(unsafe_code)]

//! Workspace store for the Plinth widget engine.
//!
//! The store is the single source of truth: an ordered collection of columns
//! of canonical widgets, with structural mutation, derived read views,
//! subscription-based value broadcast, live input/output handles, change
//! notification, and the minimal export/restore format.
//!
//! ```
//! use plinth_store::{InputOptions, WorkspaceStore};
//! use serde_json::json;
//!
//! let store = WorkspaceStore::new();
//! store
//!     .set_workspace(&json!([
//!         [{"type": "text-widget"}],
//!         [{"type": "text-widget", "inputs": {"body": {}}}],
//!     ]))
//!     .unwrap();
//! assert_eq!(store.widget_ids(), vec!["text-0", "text-1"]);
//!
//! store.emit("text-0", "body", "hello");
//! let body = store.request_input("text-1", "body", InputOptions::default()).unwrap();
//! assert_eq!(body.get(), "hello".into());
//! ```

pub mod error;
pub mod export;
pub mod handle;
pub mod route;
pub mod store;
pub mod watch;

pub use error::{Result, StoreError};
pub use export::StateEntry;
pub use handle::{InputHandle, InputOptions, OutputHandle};
pub use store::WorkspaceStore;
pub use watch::{WatchGuard, WorkspaceEvent};
