//! The observable state container.

use crate::diff::merge_partial;
use crate::error::{Result, StoreError};
use crate::listeners::{Listener, ListenerKey, ListenerRegistry};
use crate::types::{value_kind, PathCallback, StateMap, WildcardCallback};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Initial state mapping.
    pub initial_state: StateMap,

    /// Separator used to join nested keys into event paths.
    ///
    /// Callers that want unambiguous paths keep it out of their key names;
    /// this is not enforced.
    pub separator: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_state: StateMap::new(),
            separator: ".".to_string(),
        }
    }
}

/// Shared innards of a store. `Store` handles are cheap clones over this.
pub(crate) struct Shared {
    /// Current state mapping.
    state: RwLock<StateMap>,

    /// Registered callbacks by subscription key.
    listeners: RwLock<ListenerRegistry>,

    /// Peers this store already listens to, by allocation identity.
    pub(crate) links: Mutex<Vec<Weak<Shared>>>,

    /// Separator for joining nested keys.
    separator: String,
}

/// An observable key-value state container.
///
/// `set_state` merges a partial update into the current state and notifies
/// listeners about exactly the values that changed, keyed by separator-joined
/// paths (`b.c` for a change two levels deep). Two stores can be linked with
/// [`Store::sync`] so changes on either are mirrored onto the other.
///
/// All notification is synchronous: a `set_state` call returns only after
/// every resulting callback, including cascades through linked peers, has
/// run on the caller's stack.
#[derive(Clone)]
pub struct Store {
    pub(crate) inner: Arc<Shared>,
}

impl Store {
    /// Create an empty store with the default `.` separator.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store from a configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                state: RwLock::new(config.initial_state),
                listeners: RwLock::new(ListenerRegistry::default()),
                links: Mutex::new(Vec::new()),
                separator: config.separator,
            }),
        }
    }

    // --- State ---

    /// Snapshot of the current state mapping.
    ///
    /// Mutation goes through [`Store::set_state`]; editing the returned map
    /// has no effect on the store.
    pub fn state(&self) -> StateMap {
        self.inner.state.read().clone()
    }

    /// The separator used to render nested keys as event paths.
    pub fn separator(&self) -> &str {
        &self.inner.separator
    }

    /// Merge `partial` into the state and notify listeners of what changed.
    ///
    /// `partial` must be a JSON object; anything else is rejected before any
    /// mutation takes place. Values equal to the current ones are filtered
    /// out by the merge, so re-applying current state emits nothing.
    pub fn set_state(&self, partial: Value) -> Result<()> {
        let partial = match partial {
            Value::Object(map) => map,
            other => return Err(StoreError::InvalidArgument(value_kind(&other))),
        };

        let changed = {
            let mut state = self.inner.state.write();
            merge_partial(&mut state, partial)
        };

        debug!(changed = changed.len(), "state merged");
        self.emit_tree(&changed);
        Ok(())
    }

    /// Re-emit the current state as if it had just changed.
    ///
    /// With `props`, only the named top-level keys are replayed; unknown
    /// names are ignored. Nothing is mutated. Useful for bringing freshly
    /// attached listeners up to date.
    pub fn trigger_state(&self, props: Option<&[&str]>) {
        let snapshot = {
            let state = self.inner.state.read();
            match props {
                None => state.clone(),
                Some(keys) => state
                    .iter()
                    .filter(|(key, _)| keys.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            }
        };
        self.emit_tree(&snapshot);
    }

    // --- Listeners ---

    /// Register `callback` for the event path `path`.
    ///
    /// Callbacks for the same path run in registration order.
    pub fn on(&self, path: impl Into<String>, callback: PathCallback) {
        self.inner
            .listeners
            .write()
            .add(ListenerKey::Path(path.into()), Listener::Path(callback));
    }

    /// Remove a callback previously registered with [`Store::on`].
    ///
    /// Matched by identity; removing an unknown callback is a no-op.
    pub fn off(&self, path: &str, callback: &PathCallback) {
        self.inner.listeners.write().remove(
            &ListenerKey::Path(path.to_string()),
            &Listener::Path(Arc::clone(callback)),
        );
    }

    /// Register `callback` for every top-level change.
    pub fn on_all(&self, callback: WildcardCallback) {
        self.inner
            .listeners
            .write()
            .add(ListenerKey::Wildcard, Listener::Wildcard(callback));
    }

    /// Remove a callback previously registered with [`Store::on_all`].
    pub fn off_all(&self, callback: &WildcardCallback) {
        self.inner
            .listeners
            .write()
            .remove(&ListenerKey::Wildcard, &Listener::Wildcard(Arc::clone(callback)));
    }

    // --- Emission ---

    /// Walk a changed tree depth-first, emitting one event per node.
    pub(crate) fn emit_tree(&self, changed: &StateMap) {
        for (key, value) in changed {
            self.emit_subtree(key.clone(), value);
        }
    }

    fn emit_subtree(&self, path: String, value: &Value) {
        self.emit(&path, value);

        if let Value::Object(nested) = value {
            for (key, child) in nested {
                let child_path = format!("{}{}{}", path, self.inner.separator, key);
                self.emit_subtree(child_path, child);
            }
        }
    }

    /// Notify the listeners registered for `path`. A path without a
    /// separator is a top-level change and also reaches wildcard listeners.
    fn emit(&self, path: &str, value: &Value) {
        trace!(path, "emit");

        let (callbacks, wildcards) = {
            let listeners = self.inner.listeners.read();
            let callbacks = listeners.path_callbacks(path);
            let wildcards = if path.contains(&self.inner.separator) {
                Vec::new()
            } else {
                listeners.wildcard_callbacks()
            };
            (callbacks, wildcards)
        };

        // The registry lock is released before any callback runs, so a
        // callback may re-enter the store: register listeners, call
        // set_state, or cascade a change to a linked peer.
        for callback in callbacks {
            callback(value);
        }
        for callback in wildcards {
            callback(path, value);
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
