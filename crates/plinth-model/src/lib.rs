#![forbid(unsafe_code)]

//! Canonical data model for the Plinth widget workspace.
//!
//! This crate holds everything about widgets that does not require a store:
//! the canonical [`Widget`]/[`Input`] types, the primitive [`Value`] payload,
//! canonicalization of loosely-typed descriptors ([`canonicalize`]),
//! deterministic identifier assignment ([`with_unique_id`]), and the minimal
//! export form ([`MinimalWidget`]) used for persistence.
//!
//! All functions here are pure: they never touch workspace state.

pub mod canon;
pub mod error;
pub mod ident;
pub mod minimal;
pub mod value;
pub mod widget;

pub use canon::canonicalize;
pub use error::{ModelError, Result};
pub use ident::with_unique_id;
pub use minimal::{MinimalInput, MinimalWidget, MinimalWorkspace};
pub use value::Value;
pub use widget::{DefaultLabels, Input, SubscriptionState, Widget, WidgetId, WidgetShape};
