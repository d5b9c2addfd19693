//! # Statebus
//!
//! An observable key-value state container with path events and
//! bidirectional sync.
//!
//! ## Core Concepts
//!
//! - **State**: a JSON-shaped mapping, updated through partial merges
//! - **Diff tree**: the subset of an update that actually changed, the only
//!   thing listeners ever hear about
//! - **Path events**: nested changes emit under separator-joined paths
//!   (`settings.theme`), one event per changed node
//! - **Wildcard listeners**: a catch-all subscription seeing every top-level
//!   change as `(key, value)`
//! - **Sync**: two stores mirroring each other's changes, with unchanged
//!   values filtered out so propagation terminates
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::{json, Value};
//! use statebus::{PathCallback, Store};
//!
//! let store = Store::new();
//!
//! let on_theme: PathCallback = Arc::new(|value: &Value| {
//!     println!("theme is now {value}");
//! });
//! store.on("settings.theme", Arc::clone(&on_theme));
//!
//! store.set_state(json!({ "settings": { "theme": "dark" } }))?;
//! assert_eq!(store.state()["settings"]["theme"], json!("dark"));
//! # Ok::<(), statebus::StoreError>(())
//! ```

pub mod diff;
pub mod error;
mod listeners;
pub mod store;
mod sync;
pub mod types;

// Re-exports
pub use diff::merge_partial;
pub use error::{Result, StoreError};
pub use store::{Store, StoreConfig};
pub use types::{PathCallback, StateMap, WildcardCallback};
