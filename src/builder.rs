use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::argv::ParsedArgs;
use crate::config::MergedConfig;
use crate::error::RucolaError;
use crate::locate::{self, LocateInput};
use crate::parse;
use crate::resolve::{self, ResolveInput};
use crate::types::{ConfigMap, Platform};

/// Entry point for loading a rucola configuration.
pub struct Rucola;

impl Rucola {
    pub fn builder() -> RucolaBuilder {
        RucolaBuilder::new()
    }
}

enum Defaults {
    None,
    Map(ConfigMap),
    Text(String),
}

enum ArgsSource {
    Process,
    Raw(Vec<String>),
    Parsed(ParsedArgs),
}

/// Builder for configuring and loading layered configuration.
///
/// Only [`app_name()`](Self::app_name) is required. Everything the pipeline
/// would otherwise read from the process (environment, arguments, working
/// directory, platform) can be injected, which keeps tests hermetic.
pub struct RucolaBuilder {
    app_name: Option<String>,
    defaults: Defaults,
    aliases: HashMap<String, String>,
    args: ArgsSource,
    env_vars: Option<Vec<(String, String)>>,
    cwd: Option<PathBuf>,
    config_file: Option<PathBuf>,
    platform: Platform,
}

impl RucolaBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            defaults: Defaults::None,
            aliases: HashMap::new(),
            args: ArgsSource::Process,
            env_vars: None,
            cwd: None,
            config_file: None,
            platform: Platform::current(),
        }
    }

    /// Set the application name. This derives:
    /// - the candidate files (`/etc/{app}rc`, `~/.{app}rc`, ...)
    /// - the env prefix (`"{APP}_"`, uppercased)
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Built-in defaults, the lowest layer.
    pub fn defaults(mut self, defaults: ConfigMap) -> Self {
        self.defaults = Defaults::Map(defaults);
        self
    }

    /// Built-in defaults as raw text in any supported format (JSON, YAML, INI).
    pub fn defaults_str(mut self, text: &str) -> Self {
        self.defaults = Defaults::Text(text.to_string());
        self
    }

    /// Add a flag alias, e.g. `alias("g", "colors.green")`.
    pub fn alias(mut self, alt: &str, canonical: &str) -> Self {
        self.aliases.insert(alt.to_string(), canonical.to_string());
        self
    }

    pub fn aliases(mut self, aliases: HashMap<String, String>) -> Self {
        self.aliases.extend(aliases);
        self
    }

    /// Raw argument tokens (without the program name), parsed with the aliases.
    /// Default: the process arguments after the program name.
    pub fn argv<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = ArgsSource::Raw(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Already-parsed, alias-resolved arguments. Aliases set on the builder are
    /// not applied again.
    pub fn args(mut self, args: ParsedArgs) -> Self {
        self.args = ArgsSource::Parsed(args);
        self
    }

    /// Replace the process environment. Default: the process environment,
    /// minus any variable that is not valid UTF-8.
    pub fn env_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env_vars = Some(vars.into_iter().collect());
        self
    }

    /// Directory the upward `.{app}rc` search starts from.
    /// Default: the process working directory.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Explicit config file, the highest-priority file candidate. Takes
    /// precedence over a `--config` flag.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the platform conventions (default: [`Platform::current()`]).
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Resolve the effective app name, or error if missing or empty.
    fn effective_app_name(&self) -> Result<&str, RucolaError> {
        match self.app_name.as_deref() {
            None => Err(RucolaError::InvalidArgument(
                "app name is required, call .app_name() on the builder".into(),
            )),
            Some("") => Err(RucolaError::InvalidArgument(
                "app name must not be empty".into(),
            )),
            Some(name) => Ok(name),
        }
    }

    fn effective_defaults(&self) -> ConfigMap {
        match &self.defaults {
            Defaults::None => ConfigMap::new(),
            Defaults::Map(map) => map.clone(),
            Defaults::Text(text) => parse::parse(text),
        }
    }

    fn effective_args(&self) -> ParsedArgs {
        match &self.args {
            ArgsSource::Process => ParsedArgs::parse(process_args(), &self.aliases),
            ArgsSource::Raw(tokens) => ParsedArgs::parse(tokens.iter().cloned(), &self.aliases),
            ArgsSource::Parsed(args) => args.clone(),
        }
    }

    /// Build the `ResolveInput` from current builder state, reading files.
    fn build_input(&self) -> Result<ResolveInput, RucolaError> {
        let app_name = self.effective_app_name()?;
        let defaults = self.effective_defaults();
        let args = self.effective_args();
        let env_vars = match &self.env_vars {
            Some(vars) => vars.clone(),
            None => process_env_vars(),
        };
        let cwd = match &self.cwd {
            Some(dir) => Some(dir.clone()),
            None => std::env::current_dir().ok(),
        };
        let explicit = self
            .config_file
            .clone()
            .or_else(|| args.config_path().map(PathBuf::from));

        let candidates = locate::candidate_paths(&LocateInput {
            app_name,
            platform: self.platform,
            home: locate::home_dir(self.platform, &env_vars),
            cwd,
            explicit,
        });
        debug!(app = app_name, candidates = candidates.len(), "reading config files");
        let sources = locate::read_sources(&candidates);

        Ok(ResolveInput {
            app_name: app_name.to_string(),
            defaults,
            sources,
            env_vars,
            args,
        })
    }

    /// Load and merge the configuration through all layers.
    pub fn load(self) -> Result<MergedConfig, RucolaError> {
        let input = self.build_input()?;
        Ok(resolve::resolve(input))
    }
}

/// Process arguments without the program name. Non-UTF-8 tokens are
/// converted lossily.
fn process_args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Process environment, skipping pairs that are not valid UTF-8.
fn process_env_vars() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}
