//! Shared types: the configuration mapping alias and the platform switch.

/// A nested configuration mapping. Keys are unique per level; values are
/// scalars, arrays, or further mappings.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// The platform whose conventions drive candidate discovery.
///
/// Windows skips the `/etc` candidates and reads the home directory from
/// `USERPROFILE`; everything else reads `HOME`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Environment variable holding the user's home directory.
    pub fn home_var(self) -> &'static str {
        match self {
            Platform::Unix => "HOME",
            Platform::Windows => "USERPROFILE",
        }
    }

    /// Whether system-wide `/etc` candidates apply.
    pub fn has_etc(self) -> bool {
        matches!(self, Platform::Unix)
    }
}
