//! Core types for the state container.

use serde_json::Value;
use std::sync::Arc;

/// A state mapping: string keys to JSON-like values.
///
/// A value is either a scalar/array (opaque, replaced wholesale on update)
/// or a nested object (merged property by property).
pub type StateMap = serde_json::Map<String, Value>;

/// Callback registered for a single event path. Receives the changed value.
pub type PathCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Callback registered for every top-level change.
/// Receives `(key, value)` instead of just the value.
pub type WildcardCallback = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Human-readable kind name for a JSON value, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
