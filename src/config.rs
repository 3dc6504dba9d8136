//! The merged result handed back to callers.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RucolaError;
use crate::types::ConfigMap;

/// The merged configuration plus where it came from.
///
/// Serializing a `MergedConfig` emits only the configuration mapping;
/// `used_configs` and `checked_configs` are metadata and never appear in
/// the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MergedConfig {
    data: ConfigMap,
    #[serde(skip)]
    used_configs: Vec<PathBuf>,
    #[serde(skip)]
    checked_configs: Vec<PathBuf>,
}

impl MergedConfig {
    pub(crate) fn new(
        data: ConfigMap,
        used_configs: Vec<PathBuf>,
        checked_configs: Vec<PathBuf>,
    ) -> Self {
        Self {
            data,
            used_configs,
            checked_configs,
        }
    }

    /// Look up a value by dotted path (e.g. `"colors.green"`).
    ///
    /// Returns `None` when any segment is missing or a non-mapping is in the way.
    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        map_get(&self.data, dotted_path)
    }

    /// Look up a string value by dotted path.
    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path).and_then(Value::as_str)
    }

    /// The merged configuration mapping.
    pub fn data(&self) -> &ConfigMap {
        &self.data
    }

    /// Consume the result, keeping only the merged mapping.
    pub fn into_data(self) -> ConfigMap {
        self.data
    }

    /// Files that existed and contributed content, in merge order.
    pub fn used_configs(&self) -> &[PathBuf] {
        &self.used_configs
    }

    /// Every candidate path considered, found or not, in merge order.
    pub fn checked_configs(&self) -> &[PathBuf] {
        &self.checked_configs
    }

    /// Deserialize the merged mapping into a typed struct.
    ///
    /// Env and argv values arrive as strings, so fields fed from those layers
    /// should be strings or use a lenient `deserialize_with`.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, RucolaError> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }
}

/// Navigate a mapping by dotted path.
pub fn map_get<'a>(map: &'a ConfigMap, dotted_path: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_path.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_path),
    };

    let parent = match path {
        Some(path) => {
            let mut current = map;
            for segment in path.split('.') {
                current = current.get(segment)?.as_object()?;
            }
            current
        }
        None => map,
    };

    parent.get(leaf)
}
