use serde_json::Value;
use tracing::debug;

use crate::normalize::{nest, normalize};
use crate::types::ConfigMap;

/// Derive the environment variable prefix for an app name.
///
/// `"yolo"` → `"YOLO_"`, `"my-app"` → `"MY_APP_"`. Every run of
/// non-alphanumeric characters collapses to a single `_`.
pub fn env_prefix(app_name: &str) -> String {
    collapse_runs(
        &format!("{app_name}_").to_uppercase(),
        |c| !c.is_ascii_alphanumeric(),
        "_",
    )
}

/// Build a normalized mapping from environment variables matching `{PREFIX}*`.
///
/// The prefix is stripped and each run of `_` becomes a nesting level, so
/// `YOLO_COLORS_GREEN` maps to `colors.green`. Values stay strings.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_map(app_name: &str, vars: impl IntoIterator<Item = (String, String)>) -> ConfigMap {
    let prefix = env_prefix(app_name);
    debug!(%prefix, "collecting environment variables");

    let entries = vars.into_iter().filter_map(|(key, value)| {
        let rest = key.strip_prefix(&prefix)?;
        let path = collapse_runs(rest, |c| c == '_', ".");
        Some((path, Value::String(value)))
    });

    normalize(Some(&nest(entries)))
}

/// Replace every maximal run of characters matching `pred` with `with`.
pub(crate) fn collapse_runs(input: &str, pred: impl Fn(char) -> bool, with: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if pred(c) {
            if !in_run {
                out.push_str(with);
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
