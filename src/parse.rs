//! Format auto-detection by trial parsing.
//!
//! There is no extension dispatch: the same text is offered to each strategy
//! in turn and the first one that yields a mapping wins.
//!
//! 1. JSON, after stripping `//` and `/* */` comments.
//! 2. YAML. A document that is a bare scalar is rejected: INI text such as
//!    `insect=mantis` is a perfectly valid YAML plain string.
//! 3. INI, which accepts anything.
//!
//! Whatever wins is passed through [`normalize`](crate::normalize::normalize).

use serde_json::{Number, Value};
use thiserror::Error;
use tracing::trace;

use crate::ini::parse_ini;
use crate::normalize::normalize;
use crate::types::ConfigMap;

/// Why a single strategy declined the input.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{format} document is {found}, not a mapping")]
    NotAMapping {
        format: &'static str,
        found: &'static str,
    },
}

type Strategy = fn(&str) -> Result<ConfigMap, ParseError>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("json", parse_json),
    ("yaml", parse_yaml),
    ("ini", parse_ini_lenient),
];

/// Parse config text of unknown format into a normalized mapping.
pub fn parse(content: &str) -> ConfigMap {
    for (format, strategy) in STRATEGIES {
        match strategy(content) {
            Ok(map) => {
                trace!(format, "parsed config content");
                return normalize(Some(&map));
            }
            Err(error) => trace!(format, %error, "parse strategy declined"),
        }
    }
    ConfigMap::new()
}

fn parse_json(content: &str) -> Result<ConfigMap, ParseError> {
    match serde_json::from_str(&strip_json_comments(content))? {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::NotAMapping {
            format: "JSON",
            found: kind(&other),
        }),
    }
}

fn parse_yaml(content: &str) -> Result<ConfigMap, ParseError> {
    let doc: serde_yaml::Value = serde_yaml::from_str(content)?;
    match yaml_to_json(doc) {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ConfigMap::new()),
        other => Err(ParseError::NotAMapping {
            format: "YAML",
            found: kind(&other),
        }),
    }
}

fn parse_ini_lenient(content: &str) -> Result<ConfigMap, ParseError> {
    Ok(parse_ini(content))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Convert a YAML tree to JSON. Non-string mapping keys are rendered as
/// strings; tags are dropped.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut map = ConfigMap::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match yaml_to_json(key) {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Blank out `//` and `/* */` comments outside string literals.
///
/// Comment characters are replaced with spaces (newlines kept) so parser
/// error positions still line up with the original text.
pub fn strip_json_comments(content: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str,
        StrEscape,
        Line,
        Block,
    }

    let mut out = String::with_capacity(content.len());
    let mut state = State::Code;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek().copied()) {
                ('"', _) => {
                    state = State::Str;
                    out.push(c);
                }
                ('/', Some('/')) => {
                    chars.next();
                    state = State::Line;
                    out.push_str("  ");
                }
                ('/', Some('*')) => {
                    chars.next();
                    state = State::Block;
                    out.push_str("  ");
                }
                _ => out.push(c),
            },
            State::Str => {
                state = match c {
                    '\\' => State::StrEscape,
                    '"' => State::Code,
                    _ => State::Str,
                };
                out.push(c);
            }
            State::StrEscape => {
                state = State::Str;
                out.push(c);
            }
            State::Line => {
                if c == '\n' {
                    state = State::Code;
                    out.push(c);
                } else if c == '\r' {
                    out.push(c);
                } else {
                    out.push(' ');
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.push_str("  ");
                } else if c == '\n' || c == '\r' {
                    out.push(c);
                } else {
                    out.push(' ');
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{CONF_INI, CONF_JSON, CONF_YAML};
    use serde_json::json;

    #[test]
    fn json_with_comments() {
        let out = parse(CONF_JSON);
        assert_eq!(out["animal"]["bird"], "owl");
        assert_eq!(out["animal"]["insect"], "butterfly");
        // keys are normalized
        assert_eq!(out["animal"]["crab"], "triops");
    }

    #[test]
    fn yaml_nested_mapping() {
        let out = parse(CONF_YAML);
        assert_eq!(out["animal"]["bird"], "phoenix");
        assert_eq!(out["animal"]["spider"], "black widow");
    }

    #[test]
    fn bare_ini() {
        let out = parse(CONF_INI);
        assert_eq!(out["animal"]["insect"], "mantis");
        assert_eq!(out["animal"]["fish"], "catfish");
    }

    #[test]
    fn ini_without_sections_is_not_a_yaml_string() {
        let out = parse("insect=mantis\nspider=tarantula\n");
        assert_eq!(out["insect"], "mantis");
        assert_eq!(out["spider"], "tarantula");
    }

    #[test]
    fn scalar_documents_fall_through_to_ini() {
        assert_eq!(Value::Object(parse("true")), json!({"true": true}));
        assert_eq!(Value::Object(parse("42")), json!({"42": true}));
    }

    #[test]
    fn empty_yaml_is_empty_mapping() {
        assert!(parse("").is_empty());
        assert!(parse("# only a comment\n").is_empty());
    }

    #[test]
    fn ini_dotted_section_nests() {
        let out = parse("[a.b]\nc = 1\n");
        assert_eq!(out["a"]["b"]["c"], "1");
    }

    #[test]
    fn yaml_non_string_keys_stringified() {
        let out = parse("ports:\n  80: http\n  443: https\n");
        assert_eq!(out["ports"]["80"], "http");
    }

    #[test]
    fn yaml_sequence_rejected() {
        assert!(matches!(
            parse_yaml("- a\n- b\n"),
            Err(ParseError::NotAMapping { .. })
        ));
    }

    #[test]
    fn json_rejects_plain_ini() {
        assert!(parse_json("a = b").is_err());
    }

    #[test]
    fn strip_keeps_slashes_in_strings() {
        let stripped = strip_json_comments(r#"{"url": "http://x/*y*/"} // trailing"#);
        let value: Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["url"], "http://x/*y*/");
    }

    #[test]
    fn strip_handles_escaped_quotes() {
        let stripped = strip_json_comments(r#"{"a": "say \"hi\" // not a comment"}"#);
        let value: Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["a"], "say \"hi\" // not a comment");
    }

    #[test]
    fn strip_preserves_line_count() {
        let src = "{\n/* a\nb */\n\"k\": 1 // c\n}";
        assert_eq!(strip_json_comments(src).lines().count(), src.lines().count());
    }
}
