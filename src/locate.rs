//! Source discovery: which files to try, and reading them.
//!
//! # Candidates
//!
//! For app `yolo`, in **priority-ascending** order (last = highest):
//!
//! ```text
//! /etc/yolo/config              (not on Windows)
//! /etc/yolorc                   (not on Windows)
//! /etc/xdg/yolo/yolo.rc         (not on Windows)
//! ~/.config/yolo/config
//! ~/.config/yolo
//! ~/.yolo/config
//! ~/.yolorc
//! <nearest .yolorc walking up from the working directory>
//! <explicit path, e.g. from --config>
//! ```
//!
//! Home candidates are omitted when the home variable is unset. Duplicates
//! keep their first (lowest-priority) position.
//!
//! # Reading
//!
//! Every candidate gets exactly one read attempt. Missing, unreadable and
//! empty files contribute nothing; they are logged and skipped, never
//! reported as errors.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::parse::parse;
use crate::types::{ConfigMap, Platform};

/// A candidate file and what reading it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub path: PathBuf,
    /// Parsed content, or `None` when the file was missing, unreadable or empty.
    pub content: Option<ConfigMap>,
}

/// Everything needed to compute the candidate list.
#[derive(Debug, Clone)]
pub struct LocateInput<'a> {
    pub app_name: &'a str,
    pub platform: Platform,
    pub home: Option<PathBuf>,
    /// Start of the upward `.{app}rc` search; also anchors a relative explicit path.
    pub cwd: Option<PathBuf>,
    pub explicit: Option<PathBuf>,
}

/// Compute the ordered, deduplicated candidate paths.
pub fn candidate_paths(input: &LocateInput<'_>) -> Vec<PathBuf> {
    let app = input.app_name;
    let etc = Path::new("/etc");
    let system = input.platform.has_etc();
    let home = input.home.as_deref();
    let rc_name = format!(".{app}rc");

    let candidates = [
        system.then(|| etc.join(app).join("config")),
        system.then(|| etc.join(format!("{app}rc"))),
        system.then(|| etc.join("xdg").join(app).join(format!("{app}.rc"))),
        home.map(|h| h.join(".config").join(app).join("config")),
        home.map(|h| h.join(".config").join(app)),
        home.map(|h| h.join(format!(".{app}")).join("config")),
        home.map(|h| h.join(&rc_name)),
        input
            .cwd
            .as_deref()
            .and_then(|cwd| find_upward(cwd, &rc_name)),
        input
            .explicit
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| match &input.cwd {
                Some(cwd) => cwd.join(p),
                None => p.clone(),
            }),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .flatten()
        .filter(|p| !p.as_os_str().is_empty() && seen.insert(p.clone()))
        .collect()
}

/// Walk from `start` toward the filesystem root and return the first
/// `{dir}/{file_name}` that exists.
///
/// The walk ends at the directory that has no parent.
pub fn find_upward(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(file_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Resolve the home directory from environment pairs for the given platform.
pub fn home_dir<'a>(
    platform: Platform,
    vars: impl IntoIterator<Item = &'a (String, String)>,
) -> Option<PathBuf> {
    let var = platform.home_var();
    vars.into_iter()
        .find(|(key, value)| key == var && !value.is_empty())
        .map(|(_, value)| PathBuf::from(value))
}

/// Attempt one read per candidate, parsing whatever is found.
pub fn read_sources(paths: &[PathBuf]) -> Vec<Source> {
    paths
        .iter()
        .map(|path| Source {
            path: path.clone(),
            content: read_one(path).map(|content| parse(&content)),
        })
        .collect()
}

fn read_one(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.is_empty() => {
            debug!(path = %path.display(), "config file is empty");
            None
        }
        Ok(content) => {
            debug!(path = %path.display(), "loaded config file");
            Some(content)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found");
            None
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "config file unreadable");
            None
        }
    }
}
