//! Key normalization: flatten a nested mapping into dotted leaf paths,
//! lower-case every path, and re-nest.
//!
//! After normalization every key is lower-case and contains no `.`, so
//! `{"Animal.Bird": "owl"}` and `{"animal": {"BIRD": "owl"}}` both become
//! `{"animal": {"bird": "owl"}}`. The transform is pure and idempotent.
//!
//! Tie-breaks:
//! - two paths that collide after lower-casing: the first one wins;
//! - empty path segments (`"a..b"`, a leading `.`) are dropped;
//! - a scalar sitting where a later path needs a mapping is replaced.

use std::collections::HashSet;

use serde_json::Value;

use crate::types::ConfigMap;

/// Normalize a mapping. `None` normalizes to an empty mapping.
pub fn normalize(map: Option<&ConfigMap>) -> ConfigMap {
    match map {
        Some(map) => nest(lowercase_paths(flatten(map))),
        None => ConfigMap::new(),
    }
}

/// Flatten a nested mapping into `(dotted_path, leaf)` pairs in iteration order.
///
/// Arrays and empty mappings are leaves. Mappings found inside arrays are
/// normalized in place, since they cannot be addressed by a dotted path.
pub fn flatten(map: &ConfigMap) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(map, "", &mut out);
    out
}

fn flatten_into(map: &ConfigMap, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let path = dotted(prefix, key);
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(inner, &path, out),
            Value::Array(items) => out.push((path, Value::Array(normalize_items(items)))),
            other => out.push((path, other.clone())),
        }
    }
}

fn normalize_items(items: &[Value]) -> Vec<Value> {
    items
        .iter()
        .map(|item| match item {
            Value::Object(inner) => Value::Object(normalize(Some(inner))),
            Value::Array(nested) => Value::Array(normalize_items(nested)),
            other => other.clone(),
        })
        .collect()
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Lower-case whole paths, keeping the first entry when two collide.
fn lowercase_paths(entries: Vec<(String, Value)>) -> Vec<(String, Value)> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter_map(|(path, value)| {
            let path = path.to_lowercase();
            seen.insert(path.clone()).then_some((path, value))
        })
        .collect()
}

/// Expand dotted paths back into a nested mapping.
///
/// `("database.url", "pg://")` becomes `{"database": {"url": "pg://"}}`.
pub fn nest(entries: impl IntoIterator<Item = (String, Value)>) -> ConfigMap {
    let mut map = ConfigMap::new();
    for (path, value) in entries {
        set_nested(&mut map, &path, value);
    }
    map
}

fn set_nested(map: &mut ConfigMap, dotted_path: &str, value: Value) {
    let segments: Vec<&str> = dotted_path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut current = map;
    for segment in parents {
        let slot = current
            .entry(*segment)
            .or_insert_with(|| Value::Object(ConfigMap::new()));
        if !slot.is_object() {
            *slot = Value::Object(ConfigMap::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }

    // An empty mapping never clobbers a populated one at the same path.
    if let Value::Object(incoming) = &value
        && incoming.is_empty()
        && current.get(*leaf).is_some_and(Value::is_object)
    {
        return;
    }
    current.insert(leaf.to_string(), value);
}
