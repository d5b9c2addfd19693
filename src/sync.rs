//! Bidirectional linking between stores.
//!
//! A link is a wildcard subscription on the peer that re-applies each
//! `(key, value)` notification through `set_state`. Because the merge step
//! filters values that arrive unchanged, a change bouncing back to its
//! origin produces an empty diff and the cascade stops there.

use crate::store::Store;
use crate::types::{StateMap, WildcardCallback};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

impl Store {
    /// Mirror every top-level change on `peer` into this store.
    ///
    /// Listening to the same peer twice is a no-op. The subscription holds
    /// only a weak handle back to this store, so dropping every handle to it
    /// ends the mirroring instead of keeping the pair alive.
    pub fn listen(&self, peer: &Store) {
        {
            let mut links = self.inner.links.lock();
            let peer_ptr = Arc::as_ptr(&peer.inner);
            if links.iter().any(|linked| std::ptr::eq(linked.as_ptr(), peer_ptr)) {
                return;
            }
            links.push(Arc::downgrade(&peer.inner));
        }

        let origin = Arc::downgrade(&self.inner);
        let mirror: WildcardCallback = Arc::new(move |key: &str, value: &Value| {
            let Some(inner) = origin.upgrade() else {
                return;
            };
            let target = Store { inner };

            let mut partial = StateMap::new();
            partial.insert(key.to_string(), value.clone());
            if let Err(error) = target.set_state(Value::Object(partial)) {
                warn!(%error, key, "mirrored update rejected");
            }
        });

        peer.on_all(mirror);
        debug!("linked peer");
    }

    /// Establish mutual observation between two stores.
    ///
    /// Callable as a method (`a.sync(&b)`) or in associated form
    /// (`Store::sync(&a, &b)`); both link each store to the other.
    pub fn sync(&self, peer: &Store) {
        self.listen(peer);
        peer.listen(self);
    }

    /// Whether this store is already mirroring changes from `peer`.
    pub fn is_linked(&self, peer: &Store) -> bool {
        let peer_ptr = Arc::as_ptr(&peer.inner);
        self.inner
            .links
            .lock()
            .iter()
            .any(|linked| std::ptr::eq(linked.as_ptr(), peer_ptr))
    }
}
