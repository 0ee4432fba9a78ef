//! Schema validation and draft-editing support for the form renderer.
//!
//! The validation algorithm itself is the `jsonschema` crate's; this module
//! only maps its output onto per-field errors addressed by JSON Pointer, and
//! provides the pointer read/write helpers the form controls use to edit
//! nested draft values in place.

use serde_json::{Map, Value};

/// A validation failure located by JSON Pointer (`""` is the root).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub pointer: String,
    pub message: String,
}

/// Validates `value` against `schema`, collecting every failure.
///
/// A schema the validator cannot compile yields a single root-level error —
/// submission stays blocked, rendering does not.
pub fn validate(schema: &Value, value: &Value) -> Result<(), Vec<FieldError>> {
    let validator = match jsonschema::options().build(schema) {
        Ok(validator) => validator,
        Err(err) => {
            return Err(vec![FieldError {
                pointer: String::new(),
                message: format!("schema does not compile: {err}"),
            }])
        }
    };
    let errors: Vec<FieldError> = validator
        .iter_errors(value)
        .map(|err| FieldError {
            pointer: err.instance_path.to_string(),
            message: err.to_string(),
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Reads the value at a JSON Pointer, if present.
pub fn value_at<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    root.pointer(pointer)
}

/// Writes `new_value` at a JSON Pointer, creating intermediate objects as
/// needed so a fresh `{}` draft accepts edits at any depth. Array segments
/// only assign to existing indices; out-of-range writes are dropped.
pub fn set_value_at(root: &mut Value, pointer: &str, new_value: Value) {
    let segments: Vec<String> = pointer.split('/').skip(1).map(unescape).collect();
    set(root, &segments, new_value);
}

fn set(target: &mut Value, segments: &[String], new_value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = new_value;
        return;
    };
    if let Value::Array(items) = target {
        if let Ok(index) = head.parse::<usize>() {
            if let Some(slot) = items.get_mut(index) {
                set(slot, rest, new_value);
            }
            return;
        }
    }
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        let slot = map.entry(head.clone()).or_insert(Value::Null);
        set(slot, rest, new_value);
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
