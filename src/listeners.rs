//! Listener registry: ordered callback lists keyed by event path.

use crate::types::{PathCallback, WildcardCallback};
use std::collections::HashMap;
use std::sync::Arc;

/// Subscription key: a concrete event path, or the catch-all slot.
///
/// Keeping the wildcard as its own variant means no state property can ever
/// collide with it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ListenerKey {
    Path(String),
    Wildcard,
}

/// A registered callback of either flavor.
pub(crate) enum Listener {
    Path(PathCallback),
    Wildcard(WildcardCallback),
}

impl Listener {
    /// Identity comparison. Two listeners match only when they share the
    /// same allocation, the way callers that registered a callback hold it.
    fn ptr_eq(&self, other: &Listener) -> bool {
        match (self, other) {
            (Listener::Path(a), Listener::Path(b)) => Arc::ptr_eq(a, b),
            (Listener::Wildcard(a), Listener::Wildcard(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Callback lists by subscription key. Insertion order is invocation order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: HashMap<ListenerKey, Vec<Listener>>,
}

impl ListenerRegistry {
    /// Append `listener` under `key`, creating the list on first use.
    pub fn add(&mut self, key: ListenerKey, listener: Listener) {
        self.entries.entry(key).or_default().push(listener);
    }

    /// Remove the first registration matching `listener` by identity.
    /// Unknown keys and callbacks are ignored.
    pub fn remove(&mut self, key: &ListenerKey, listener: &Listener) {
        if let Some(list) = self.entries.get_mut(key) {
            if let Some(index) = list.iter().position(|l| l.ptr_eq(listener)) {
                list.remove(index);
            }
        }
    }

    /// Snapshot of the path callbacks for `path`, in registration order.
    pub fn path_callbacks(&self, path: &str) -> Vec<PathCallback> {
        self.entries
            .get(&ListenerKey::Path(path.to_string()))
            .map(|list| {
                list.iter()
                    .filter_map(|listener| match listener {
                        Listener::Path(callback) => Some(Arc::clone(callback)),
                        Listener::Wildcard(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Snapshot of the wildcard callbacks, in registration order.
    pub fn wildcard_callbacks(&self) -> Vec<WildcardCallback> {
        self.entries
            .get(&ListenerKey::Wildcard)
            .map(|list| {
                list.iter()
                    .filter_map(|listener| match listener {
                        Listener::Wildcard(callback) => Some(Arc::clone(callback)),
                        Listener::Path(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
