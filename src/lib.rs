//! Layered configuration for command-line tools, in the spirit of the
//! classic rc-file loaders.
//!
//! Rucola collects settings from built-in defaults, a conventional list of
//! rc files, prefixed environment variables and command-line flags, and
//! deep-merges them into one mapping:
//!
//! ```ignore
//! let config = Rucola::builder()
//!     .app_name("yolo")
//!     .defaults_str(r#"{"colors": {"green": "#00FF00"}}"#)
//!     .alias("g", "colors.green")
//!     .load()?;
//!
//! let green = config.get_str("colors.green");
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Built-in defaults     .defaults() / .defaults_str()
//!        ↑ overridden by
//! Config files          candidate list in order, later files win
//!        ↑ overridden by
//! Environment vars      YOLO_COLORS_GREEN
//!        ↑ overridden by
//! Command line          --colors-green, -g
//! ```
//!
//! Every layer is sparse: it only overrides the keys it sets. Mappings merge
//! key by key; anything else (arrays included) is replaced wholesale.
//!
//! # Config files
//!
//! For app `yolo` the candidates are, lowest priority first:
//!
//! ```text
//! /etc/yolo/config  /etc/yolorc  /etc/xdg/yolo/yolo.rc      (not on Windows)
//! ~/.config/yolo/config  ~/.config/yolo  ~/.yolo/config  ~/.yolorc
//! nearest .yolorc walking up from the working directory
//! --config <path> (or .config_file())
//! ```
//!
//! Missing, unreadable and empty files are skipped silently. The format is
//! detected from content, not from the file name: JSON (with `//` and
//! `/* */` comments), then YAML, then INI, which accepts anything. See
//! [`MergedConfig::used_configs`] and [`MergedConfig::checked_configs`] for
//! what was actually read.
//!
//! # Keys
//!
//! All keys are lower-cased and dotted keys are expanded into nesting, so
//! `"Colors.Green": "x"` in a file and `colors: {green: x}` are the same
//! setting. Environment variables use the upper-cased app name plus `_` as
//! prefix, and every run of underscores separates a level:
//!
//! | Source | Config key |
//! |--------|------------|
//! | `YOLO_COLORS_GREEN` | `colors.green` |
//! | `YOLO_DONKEY__MINERALS` | `donkey.minerals` |
//! | `--retract-landinggear` | `retract.landinggear` |
//! | `--missing-nails-plural=slope` | `missing.nails.plural` |
//!
//! Positional arguments land verbatim under the reserved `_` key.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`ParsedArgs::from_clap`] turns
//! clap matches into the args layer. Build without it using
//! `default-features = false`.
//!
//! # Error handling
//!
//! Loading only fails on caller mistakes, reported as [`RucolaError`]. Bad
//! files never fail a load. With the `rich-errors` feature the error type
//! also implements `miette::Diagnostic`.

pub mod error;
pub mod types;

mod argv;
mod builder;
#[cfg(feature = "clap")]
mod cli;
mod config;
mod env;
mod ini;
mod locate;
mod merge;
mod normalize;
mod parse;
mod resolve;

#[cfg(test)]
mod fixtures;

pub use argv::{POSITIONAL_KEY, ParsedArgs};
pub use builder::{Rucola, RucolaBuilder};
pub use config::MergedConfig;
pub use error::RucolaError;
pub use normalize::normalize;
pub use parse::parse;
pub use types::{ConfigMap, Platform};
