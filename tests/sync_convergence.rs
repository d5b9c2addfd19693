//! Bidirectional sync tests: convergence, termination, link bookkeeping.

use serde_json::{json, Value};
use statebus::{StateMap, Store, WildcardCallback};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn obj(value: Value) -> StateMap {
    value.as_object().cloned().unwrap()
}

fn change_counter(store: &Store) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let callback: WildcardCallback = Arc::new(move |_: &str, _: &Value| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    store.on_all(callback);
    count
}

#[test]
fn test_synced_pair_converges() {
    let a = Store::new();
    let b = Store::new();
    Store::sync(&a, &b);

    a.set_state(json!({ "x": 1 })).unwrap();
    assert_eq!(a.state(), obj(json!({ "x": 1 })));
    assert_eq!(b.state(), obj(json!({ "x": 1 })));

    b.set_state(json!({ "y": 2 })).unwrap();
    assert_eq!(a.state(), obj(json!({ "x": 1, "y": 2 })));
    assert_eq!(b.state(), obj(json!({ "x": 1, "y": 2 })));
}

#[test]
fn test_propagation_terminates_after_one_round_trip() {
    let a = Store::new();
    let b = Store::new();
    Store::sync(&a, &b);

    let a_changes = change_counter(&a);
    let b_changes = change_counter(&b);

    a.set_state(json!({ "x": 1 })).unwrap();

    // One change on each side: the value reflected back to a arrives
    // unchanged, produces an empty diff, and the cascade stops.
    assert_eq!(a_changes.load(Ordering::SeqCst), 1);
    assert_eq!(b_changes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_nested_changes_propagate() {
    let a = Store::new();
    let b = Store::new();
    a.set_state(json!({ "user": { "name": "ada", "age": 36 } })).unwrap();
    b.set_state(json!({ "user": { "name": "ada", "age": 36 } })).unwrap();
    Store::sync(&a, &b);

    a.set_state(json!({ "user": { "age": 37 } })).unwrap();

    assert_eq!(b.state(), obj(json!({ "user": { "name": "ada", "age": 37 } })));
    assert_eq!(a.state(), b.state());
}

#[test]
fn test_sync_twice_is_idempotent() {
    let a = Store::new();
    let b = Store::new();
    Store::sync(&a, &b);
    Store::sync(&a, &b);
    b.sync(&a);

    assert!(a.is_linked(&b));
    assert!(b.is_linked(&a));

    let b_changes = change_counter(&b);
    a.set_state(json!({ "x": 1 })).unwrap();
    assert_eq!(b_changes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_three_way_ring_terminates_and_converges() {
    let a = Store::new();
    let b = Store::new();
    let c = Store::new();
    Store::sync(&a, &b);
    Store::sync(&b, &c);
    Store::sync(&c, &a);

    a.set_state(json!({ "x": 1 })).unwrap();

    assert_eq!(a.state(), obj(json!({ "x": 1 })));
    assert_eq!(b.state(), obj(json!({ "x": 1 })));
    assert_eq!(c.state(), obj(json!({ "x": 1 })));

    c.set_state(json!({ "x": 2, "y": 3 })).unwrap();

    assert_eq!(a.state(), obj(json!({ "x": 2, "y": 3 })));
    assert_eq!(b.state(), obj(json!({ "x": 2, "y": 3 })));
    assert_eq!(c.state(), obj(json!({ "x": 2, "y": 3 })));
}

#[test]
fn test_dropped_peer_stops_mirroring() {
    let a = Store::new();
    let b = Store::new();
    Store::sync(&a, &b);

    drop(b);

    // The mirror registered on a holds only a weak handle to b.
    a.set_state(json!({ "x": 1 })).unwrap();
    assert_eq!(a.state(), obj(json!({ "x": 1 })));
}
