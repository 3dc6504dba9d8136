use serde_json::Value;

use crate::types::ConfigMap;

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a mapping for the same key, recurse.
/// Otherwise, `overlay`'s value wins, arrays included.
///
/// Existing keys keep their position in `base`; new keys are appended.
pub fn deep_merge(mut base: ConfigMap, overlay: ConfigMap) -> ConfigMap {
    for (key, overlay_val) in overlay {
        match overlay_val {
            Value::Object(overlay_map) => match base.get_mut(&key) {
                Some(Value::Object(base_map)) => {
                    let merged = deep_merge(std::mem::take(base_map), overlay_map);
                    *base_map = merged;
                }
                _ => {
                    base.insert(key, Value::Object(overlay_map));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::map;
    use serde_json::json;

    #[test]
    fn disjoint_keys_merge() {
        let merged = deep_merge(map(json!({"host": "localhost"})), map(json!({"port": 3000})));
        assert_eq!(merged["host"], "localhost");
        assert_eq!(merged["port"], 3000);
    }

    #[test]
    fn same_scalar_key_overlay_wins() {
        let merged = deep_merge(map(json!({"port": 8080})), map(json!({"port": 3000})));
        assert_eq!(merged["port"], 3000);
    }

    #[test]
    fn nested_mappings_recurse() {
        let base = map(json!({"a": {"p": 1, "q": 2}}));
        let overlay = map(json!({"a": {"q": 3}}));
        let merged = deep_merge(base, overlay);
        assert_eq!(Value::Object(merged), json!({"a": {"p": 1, "q": 3}}));
    }

    #[test]
    fn overlay_scalar_replaces_mapping() {
        let base = map(json!({"database": {"url": "x"}}));
        let overlay = map(json!({"database": "flat_string"}));
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["database"], "flat_string");
    }

    #[test]
    fn overlay_mapping_replaces_scalar() {
        let base = map(json!({"database": "flat_string"}));
        let overlay = map(json!({"database": {"url": "x"}}));
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["database"], json!({"url": "x"}));
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let base = map(json!({"_": ["a", "b"]}));
        let overlay = map(json!({"_": ["c"]}));
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["_"], json!(["c"]));
    }

    #[test]
    fn key_order_is_preserved() {
        let base = map(json!({"a": 1, "b": 2, "c": 3}));
        let merged = deep_merge(base, map(json!({"a": 9, "d": 4})));
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c", "d"]);
        assert_eq!(merged["a"], 9);
    }

    #[test]
    fn nested_key_order_is_preserved() {
        let base = map(json!({"colors": {"blue": 1, "green": 2, "red": 3}}));
        let merged = deep_merge(base, map(json!({"colors": {"blue": 0}})));
        let keys: Vec<&str> = merged["colors"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["blue", "green", "red"]);
    }

    #[test]
    fn empty_overlay_returns_base() {
        let base = map(json!({"port": 8080}));
        let merged = deep_merge(base.clone(), ConfigMap::new());
        assert_eq!(merged, base);
    }

    #[test]
    fn empty_base_returns_overlay() {
        let overlay = map(json!({"port": 3000}));
        let merged = deep_merge(ConfigMap::new(), overlay.clone());
        assert_eq!(merged, overlay);
    }

    #[test]
    fn deeply_nested_three_levels() {
        let base = map(json!({"a": {"b": {"c": {"val": 1, "other": "keep"}}}}));
        let overlay = map(json!({"a": {"b": {"c": {"val": 99}}}}));
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["a"]["b"]["c"]["val"], 99);
        assert_eq!(merged["a"]["b"]["c"]["other"], "keep");
    }

    #[test]
    fn multiple_sequential_merges() {
        let a = map(json!({"host": "a"}));
        let b = map(json!({"port": 1000}));
        let c = map(json!({"host": "c"}));
        let merged = deep_merge(deep_merge(a, b), c);
        assert_eq!(merged["host"], "c");
        assert_eq!(merged["port"], 1000);
    }
}
