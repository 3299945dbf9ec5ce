//! Local mirror of a listened location.
//!
//! The database never stores null or empty objects: writing null deletes a
//! node, and a parent left without children disappears too.

use serde_json::{Map, Value};

use super::path;

/// Replace the node at `rel_path` with `data`.
pub fn apply_put(root: &mut Value, rel_path: &str, data: Value) {
    let segs = path::segments(rel_path);
    put_at(root, &segs, data);
}

/// Apply every child of `data` as a put below `rel_path`.
///
/// Child keys may themselves be multi-segment paths.
pub fn apply_patch(root: &mut Value, rel_path: &str, data: Value) {
    match data {
        Value::Object(children) => {
            for (key, value) in children {
                apply_put(root, &path::join(rel_path, &key), value);
            }
        }
        Value::Null => {}
        other => apply_put(root, rel_path, other),
    }
}

fn is_empty(node: &Value) -> bool {
    match node {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn put_at(node: &mut Value, segs: &[&str], data: Value) {
    let Some((head, rest)) = segs.split_first() else {
        *node = if is_empty(&data) { Value::Null } else { data };
        return;
    };

    if !node.is_object() {
        if data.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else {
        return;
    };

    let child = map.entry((*head).to_string()).or_insert(Value::Null);
    put_at(child, rest, data);
    if is_empty(child) {
        map.remove(*head);
    }
    if map.is_empty() {
        *node = Value::Null;
    }
}
