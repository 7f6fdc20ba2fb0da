#![forbid(unsafe_code)]

//! Workspace change notification.
//!
//! The store keeps a list of watcher callbacks as weak references; a watcher
//! stays registered for as long as its [`WatchGuard`] is alive. Dead entries
//! are pruned lazily when events fire.
//!
//! A full workspace replacement notifies twice: [`WorkspaceEvent::Cleared`]
//! while the store is actually empty, then [`WorkspaceEvent::Structure`] once
//! the new state is committed. A display layer that rebuilds on `Cleared`
//! gets a full structural re-render instead of an incorrect incremental diff.
//!
//! # Invariants
//!
//! 1. Watchers are invoked in registration order.
//! 2. Callbacks run with no store borrow held, so a watcher may call back
//!    into the store (including registering further watchers).

use std::rc::{Rc, Weak};

/// What changed in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// The store was emptied at the start of a full replacement.
    Cleared,
    /// Columns or widgets were added, removed, or moved.
    Structure,
    /// One or more input values were written.
    ValueWritten,
}

type Callback = Rc<dyn Fn(&WorkspaceEvent)>;
type CallbackWeak = Weak<dyn Fn(&WorkspaceEvent)>;

/// Keeps a watcher callback alive. Dropping the guard unregisters it.
pub struct WatchGuard {
    _callback: Callback,
}

impl std::fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchGuard").finish_non_exhaustive()
    }
}

/// Watcher list held inside the store state.
#[derive(Default)]
pub(crate) struct Watchers {
    subscribers: Vec<CallbackWeak>,
}

impl Watchers {
    /// Register a callback; it lives until the returned guard is dropped.
    pub(crate) fn register(&mut self, callback: impl Fn(&WorkspaceEvent) + 'static) -> WatchGuard {
        let callback: Callback = Rc::new(callback);
        self.subscribers.push(Rc::downgrade(&callback));
        WatchGuard {
            _callback: callback,
        }
    }

    /// Upgrade the live callbacks, pruning dead entries in place.
    ///
    /// The strong handles are returned to the caller so it can invoke them
    /// after releasing the store borrow.
    pub(crate) fn live(&mut self) -> Vec<Callback> {
        let mut live = Vec::with_capacity(self.subscribers.len());
        self.subscribers.retain(|weak| match weak.upgrade() {
            Some(callback) => {
                live.push(callback);
                true
            }
            None => false,
        });
        live
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
