//! Command-line flags: a minimist-style parser and the extractor that turns
//! parsed flags into a configuration layer.
//!
//! The parser knows nothing about the config schema. Any `--flag` is
//! accepted, so `--colors-green emerald` works without declaring
//! `colors.green` anywhere:
//!
//! | Tokens | Parsed |
//! |--------|--------|
//! | `--port 80` / `--port=80` | `port = "80"` |
//! | `--retract-landinggear` | `retract-landinggear = true` |
//! | `--no-color` | `color = false` |
//! | `-g moss` (alias `g` → `colors.green`) | `g = "moss"`, `colors.green = "moss"` |
//! | `-abc` | `a = b = c = true` |
//! | `w00t`, anything after `--` | positional |
//!
//! The extractor then maps `retract-landinggear` to `retract.landinggear`
//! and keeps positionals verbatim under the reserved `_` key.

use std::collections::HashMap;

use serde_json::Value;

use crate::env::collapse_runs;
use crate::normalize::normalize;
use crate::types::ConfigMap;

/// Reserved key holding positional arguments in the args layer.
pub const POSITIONAL_KEY: &str = "_";

/// Alias-resolved command-line flags plus free-standing positional tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    /// Flag name to value. Bare flags are `true`, repeated flags are arrays.
    pub flags: ConfigMap,
    /// Tokens not bound to any flag, in order.
    pub positional: Vec<String>,
}

impl ParsedArgs {
    /// Parse raw tokens (without the program name).
    ///
    /// `aliases` maps alternative names to canonical ones (`g` → `colors.green`);
    /// setting either name sets both.
    pub fn parse<I, S>(args: I, aliases: &HashMap<String, String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parser = Parser {
            out: ParsedArgs::default(),
            aliases: AliasTable::new(aliases),
        };
        let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
        parser.run(&tokens);
        parser.out
    }

    /// The `--config <path>` value, when given as a string.
    pub fn config_path(&self) -> Option<&str> {
        self.flags.get("config").and_then(Value::as_str)
    }
}

/// Bidirectional alias groups: every name maps to all names it is tied to.
struct AliasTable {
    groups: HashMap<String, Vec<String>>,
}

impl AliasTable {
    fn new(aliases: &HashMap<String, String>) -> Self {
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        let mut link = |from: &str, to: &str| {
            let names = groups.entry(from.to_string()).or_default();
            if from != to && !names.iter().any(|n| n == to) {
                names.push(to.to_string());
            }
        };
        for (alt, canonical) in aliases {
            link(alt, canonical);
            link(canonical, alt);
        }
        Self { groups }
    }

    fn names_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        std::iter::once(name).chain(
            self.groups
                .get(name)
                .into_iter()
                .flatten()
                .map(String::as_str),
        )
    }
}

struct Parser {
    out: ParsedArgs,
    aliases: AliasTable,
}

impl Parser {
    fn run(&mut self, tokens: &[String]) {
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_str();
            let next = tokens.get(i + 1).map(String::as_str);

            if token == "--" {
                self.out.positional.extend(tokens[i + 1..].iter().cloned());
                return;
            }

            if let Some(long) = token.strip_prefix("--") {
                i += self.long_flag(long, next);
            } else if let Some(short) = token.strip_prefix('-')
                && !short.is_empty()
            {
                i += self.short_flags(short, next);
            } else {
                self.out.positional.push(token.to_string());
            }
            i += 1;
        }
    }

    /// Returns how many extra tokens were consumed.
    fn long_flag(&mut self, body: &str, next: Option<&str>) -> usize {
        if let Some((name, value)) = body.split_once('=') {
            self.set(name, Value::String(value.to_string()));
            return 0;
        }
        if let Some(negated) = body.strip_prefix("no-") {
            self.set(negated, Value::Bool(false));
            return 0;
        }
        self.set_with_next(body, next)
    }

    fn short_flags(&mut self, letters: &str, next: Option<&str>) -> usize {
        if let Some((name, value)) = letters.split_once('=') {
            self.set(name, Value::String(value.to_string()));
            return 0;
        }
        let chars: Vec<char> = letters.chars().collect();
        let Some((last, rest)) = chars.split_last() else {
            return 0;
        };
        for c in rest {
            self.set(&c.to_string(), Value::Bool(true));
        }
        self.set_with_next(&last.to_string(), next)
    }

    fn set_with_next(&mut self, name: &str, next: Option<&str>) -> usize {
        match next {
            Some("true") => {
                self.set(name, Value::Bool(true));
                1
            }
            Some("false") => {
                self.set(name, Value::Bool(false));
                1
            }
            Some(value) if !value.starts_with('-') => {
                self.set(name, Value::String(value.to_string()));
                1
            }
            _ => {
                self.set(name, Value::Bool(true));
                0
            }
        }
    }

    /// Set `name` and all of its aliases. A repeated flag collects into an array.
    fn set(&mut self, name: &str, value: Value) {
        let names: Vec<String> = self.aliases.names_for(name).map(str::to_string).collect();
        for key in names {
            let slot = match self.out.flags.remove(&key) {
                None => value.clone(),
                Some(Value::Array(mut items)) => {
                    items.push(value.clone());
                    Value::Array(items)
                }
                Some(previous) => Value::Array(vec![previous, value.clone()]),
            };
            self.out.flags.insert(key, slot);
        }
    }
}

/// Turn parsed flags into a normalized configuration layer.
///
/// Every run of non-alphanumeric characters in a flag name becomes a `.`,
/// so `--missing-nails-plural` lands at `missing.nails.plural`. Positionals
/// are kept verbatim under [`POSITIONAL_KEY`].
pub fn args_to_map(args: &ParsedArgs) -> ConfigMap {
    let mut map = ConfigMap::new();
    for (name, value) in &args.flags {
        if name == POSITIONAL_KEY {
            continue;
        }
        let path = collapse_runs(name, |c| !c.is_ascii_alphanumeric(), ".");
        map.insert(path, value.clone());
    }

    let mut normalized = normalize(Some(&map));
    normalized.insert(
        POSITIONAL_KEY.to_string(),
        Value::Array(
            args.positional
                .iter()
                .map(|token| Value::String(token.clone()))
                .collect(),
        ),
    );
    normalized
}
