//! Lenient INI reader, the last-resort parsing strategy.
//!
//! Accepts any text: lines it cannot make sense of become `key = true`
//! flags, and nothing is ever rejected.
//!
//! ```text
//! ; comment            # comment
//! top = level
//! [animal]             -> {"animal": {...}}
//! insect = mantis
//! quoted = "a;b"       -> "a;b"
//! plain = x ; note     -> "x"
//! tags[] = one         -> ["one", "two"]
//! tags[] = two
//! verbose              -> true
//! [a.b]                -> {"a.b": {...}}, nested later by the normalizer
//! ```

use serde_json::Value;

use crate::types::ConfigMap;

/// Parse INI text into a mapping. Section names are kept verbatim as keys.
pub fn parse_ini(content: &str) -> ConfigMap {
    let mut out = ConfigMap::new();
    let mut section: Option<String> = None;

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = section_header(line) {
            let name = unescape(name);
            let slot = out
                .entry(name.clone())
                .or_insert_with(|| Value::Object(ConfigMap::new()));
            if !slot.is_object() {
                *slot = Value::Object(ConfigMap::new());
            }
            section = Some(name);
            continue;
        }

        let (key, value) = match line.split_once('=') {
            Some((key, value)) => (unescape(key), coerce(unescape(value))),
            None => (unescape(line), Value::Bool(true)),
        };
        if key.is_empty() {
            continue;
        }

        let target = match &section {
            Some(name) => match out.get_mut(name).and_then(Value::as_object_mut) {
                Some(table) => table,
                None => continue,
            },
            None => &mut out,
        };
        insert_key(target, key, value);
    }

    out
}

fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    (!inner.contains(']')).then_some(inner)
}

/// `key[] = v` appends to an array; a plain key overwrites.
fn insert_key(target: &mut ConfigMap, key: String, value: Value) {
    let Some(array_key) = key.strip_suffix("[]") else {
        target.insert(key, value);
        return;
    };
    match target.get_mut(array_key) {
        Some(Value::Array(items)) => items.push(value),
        _ => {
            target.insert(array_key.to_string(), Value::Array(vec![value]));
        }
    }
}

fn coerce(value: String) -> Value {
    match value.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::String(value),
    }
}

/// Unquote a quoted token, or strip the inline comment from a bare one.
///
/// Inside a bare token, `\;`, `\#` and `\\` escape the character; any other
/// backslash is kept literally.
fn unescape(token: &str) -> String {
    let token = token.trim();

    if token.len() >= 2 {
        if token.starts_with('"') && token.ends_with('"') {
            return serde_json::from_str::<String>(token)
                .unwrap_or_else(|_| token[1..token.len() - 1].to_string());
        }
        if token.starts_with('\'') && token.ends_with('\'') {
            return token[1..token.len() - 1].to_string();
        }
    }

    let mut out = String::with_capacity(token.len());
    let mut escaped = false;
    for c in token.chars() {
        if escaped {
            if !matches!(c, '\\' | ';' | '#') {
                out.push('\\');
            }
            out.push(c);
            escaped = false;
        } else if c == ';' || c == '#' {
            break;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    if escaped {
        out.push('\\');
    }
    out.trim().to_string()
}
