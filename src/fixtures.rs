#[cfg(test)]
pub mod test {
    use serde_json::Value;

    use crate::types::ConfigMap;

    /// Unwrap a `json!` object literal into a `ConfigMap`.
    pub fn map(value: Value) -> ConfigMap {
        match value {
            Value::Object(m) => m,
            other => panic!("fixture is not an object: {other}"),
        }
    }

    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -- Sample config files, one per format -----------------------------------

    pub const CONF_INI: &str = "\
; animals overriding the defaults
[animal]
insect = mantis
spider = tarantula
fish = catfish
";

    pub const CONF_YAML: &str = "\
animal:
  bird: phoenix
  insect: bee
  spider: black widow
  fish: puffer fish
";

    pub const CONF_JSON: &str = r#"{
  // line comment
  "animal": {
    "bird": "owl", /* block comment */
    "insect": "butterfly",
    "spider": "wolfspider",
    "fish": "salmon",
    "Crab": "triops"
  }
}
"#;

    #[test]
    fn map_unwraps_object() {
        let m = map(serde_json::json!({"a": 1}));
        assert_eq!(m["a"], 1);
    }
}
