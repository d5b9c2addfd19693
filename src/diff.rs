//! Recursive merge with change tracking.
//!
//! The merge walks a partial update against the current state, mutating the
//! state in place and collecting a parallel tree of the values that actually
//! differed. Nested objects are diffed property by property; scalars and
//! arrays are opaque and replaced wholesale.

use crate::types::StateMap;
use serde_json::map::Entry;
use serde_json::Value;

/// Merge `partial` into `state`, returning the tree of changed values.
///
/// The returned map mirrors the shape of `partial` but contains only entries
/// whose values differed from `state`:
///
/// - a key absent from `state` contributes its whole value,
/// - a value equal to the current one contributes nothing,
/// - two objects recurse, contributing the nested diff (which may be empty
///   when only a proper subset of the nested keys matched),
/// - anything else is an overwrite and contributes the new value.
pub fn merge_partial(state: &mut StateMap, partial: StateMap) -> StateMap {
    let mut changed = StateMap::new();

    for (key, new_value) in partial {
        match state.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(new_value.clone());
                changed.insert(key, new_value);
            }
            Entry::Occupied(mut slot) => {
                if *slot.get() == new_value {
                    continue;
                }
                match (slot.get_mut(), new_value) {
                    (Value::Object(old), Value::Object(new)) => {
                        let nested = merge_partial(old, new);
                        changed.insert(key, Value::Object(nested));
                    }
                    (old, new) => {
                        *old = new.clone();
                        changed.insert(key, new);
                    }
                }
            }
        }
    }

    changed
}
