//! Core resolution pipeline: merge all layers into a [`MergedConfig`].
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Layers, lowest priority first:
//!
//! 1. Normalized defaults
//! 2. Each file with content, in candidate order
//! 3. Environment variables with the app prefix
//! 4. Command-line flags and positionals

use tracing::debug;

use crate::argv::{ParsedArgs, args_to_map};
use crate::config::MergedConfig;
use crate::env::env_to_map;
use crate::locate::Source;
use crate::merge::deep_merge;
use crate::normalize::normalize;
use crate::types::ConfigMap;

/// All pre-loaded data needed to resolve a config. No I/O happens here.
pub struct ResolveInput {
    pub app_name: String,
    /// Built-in defaults, not yet normalized.
    pub defaults: ConfigMap,
    /// Every candidate in precedence order: first = lowest priority.
    pub sources: Vec<Source>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    pub args: ParsedArgs,
}

/// Resolve configuration from pre-loaded inputs.
pub fn resolve(input: ResolveInput) -> MergedConfig {
    let mut merged = normalize(Some(&input.defaults));

    let mut used = Vec::new();
    let mut checked = Vec::with_capacity(input.sources.len());
    for source in input.sources {
        checked.push(source.path.clone());
        if let Some(content) = source.content {
            merged = deep_merge(merged, content);
            used.push(source.path);
        }
    }

    merged = deep_merge(merged, env_to_map(&input.app_name, input.env_vars));
    merged = deep_merge(merged, args_to_map(&input.args));

    debug!(
        used = used.len(),
        checked = checked.len(),
        "resolved configuration layers"
    );
    MergedConfig::new(merged, used, checked)
}
