//! Clap adapter for rucola.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Apps that
//! already declare their flags with clap can feed the parsed matches into the
//! args layer instead of letting rucola re-parse the raw tokens:
//!
//! ```ignore
//! let cmd = Command::new("yolo").arg(Arg::new("colors-green").long("colors-green"));
//! let matches = cmd.clone().get_matches();
//! let config = Rucola::builder()
//!     .app_name("yolo")
//!     .args(ParsedArgs::from_clap(&cmd, &matches))
//!     .load()?;
//! ```
//!
//! Only arguments the user actually supplied are carried over. Values that
//! clap filled in from `default_value` are skipped, so they never shadow a
//! file or environment setting. Subcommand matches are not descended into.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;

use crate::argv::ParsedArgs;

impl ParsedArgs {
    /// Build the args layer from clap's parse result.
    ///
    /// Flags are keyed by their long name (falling back to the arg id).
    /// `SetTrue`/`SetFalse` become booleans, `Count` a number, and valued
    /// options a string, or an array of strings when given more than once.
    pub fn from_clap(cmd: &Command, matches: &ArgMatches) -> Self {
        let mut args = ParsedArgs::default();
        for arg in cmd.get_arguments() {
            let id = arg.get_id().as_str();
            match matches.value_source(id) {
                None | Some(ValueSource::DefaultValue) => continue,
                Some(_) => {}
            }

            if arg.is_positional() {
                args.positional.extend(raw_strings(matches, id));
                continue;
            }

            let Some(value) = flag_value(arg, matches) else {
                continue;
            };
            let name = arg.get_long().unwrap_or(id);
            args.flags.insert(name.to_string(), value);
        }
        args
    }
}

fn flag_value(arg: &Arg, matches: &ArgMatches) -> Option<Value> {
    let id = arg.get_id().as_str();
    match arg.get_action() {
        ArgAction::SetTrue | ArgAction::SetFalse => matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .map(|b| Value::Bool(*b)),
        ArgAction::Count => matches
            .try_get_one::<u8>(id)
            .ok()
            .flatten()
            .map(|n| Value::from(*n)),
        ArgAction::Help
        | ArgAction::HelpShort
        | ArgAction::HelpLong
        | ArgAction::Version => None,
        _ => {
            let mut values: Vec<Value> = raw_strings(matches, id).map(Value::String).collect();
            match values.len() {
                0 => None,
                1 => values.pop(),
                _ => Some(Value::Array(values)),
            }
        }
    }
}

fn raw_strings<'a>(matches: &'a ArgMatches, id: &str) -> impl Iterator<Item = String> + 'a {
    matches
        .get_raw(id)
        .into_iter()
        .flatten()
        .map(|raw| raw.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argv::args_to_map;
    use serde_json::json;

    fn command() -> Command {
        Command::new("yolo")
            .arg(Arg::new("target"))
            .arg(Arg::new("colors-green").long("colors-green"))
            .arg(
                Arg::new("retract")
                    .long("retract-landinggear")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("no-cache")
                    .long("no-cache")
                    .action(ArgAction::SetFalse),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .action(ArgAction::Count),
            )
            .arg(
                Arg::new("tag")
                    .long("tag")
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("level")
                    .long("level")
                    .default_value("info"),
            )
    }

    fn parse(tokens: &[&str]) -> ParsedArgs {
        let cmd = command();
        let matches = cmd.clone().try_get_matches_from(tokens).unwrap();
        ParsedArgs::from_clap(&cmd, &matches)
    }

    #[test]
    fn valued_option_is_string() {
        let args = parse(&["yolo", "--colors-green", "emerald"]);
        assert_eq!(args.flags["colors-green"], "emerald");
    }

    #[test]
    fn set_true_flag_is_bool() {
        let args = parse(&["yolo", "--retract-landinggear"]);
        assert_eq!(args.flags["retract-landinggear"], true);
    }

    #[test]
    fn set_false_flag_is_bool() {
        let args = parse(&["yolo", "--no-cache"]);
        assert_eq!(args.flags["no-cache"], false);
    }

    #[test]
    fn count_flag_is_number_keyed_by_id() {
        let args = parse(&["yolo", "-vvv"]);
        assert_eq!(args.flags["verbose"], 3);
    }

    #[test]
    fn repeated_option_is_array() {
        let args = parse(&["yolo", "--tag", "a", "--tag", "b"]);
        assert_eq!(args.flags["tag"], json!(["a", "b"]));
    }

    #[test]
    fn positional_goes_to_positional_list() {
        let args = parse(&["yolo", "w00t"]);
        assert_eq!(args.positional, vec!["w00t"]);
        assert!(args.flags.get("target").is_none());
    }

    #[test]
    fn absent_and_defaulted_args_skipped() {
        let args = parse(&["yolo"]);
        assert!(args.flags.is_empty());
        assert!(args.positional.is_empty());
    }

    #[test]
    fn explicit_value_over_default_kept() {
        let args = parse(&["yolo", "--level", "debug"]);
        assert_eq!(args.flags["level"], "debug");
    }

    #[test]
    fn feeds_args_layer() {
        let map = args_to_map(&parse(&[
            "yolo",
            "w00t",
            "--colors-green",
            "moss",
            "--retract-landinggear",
        ]));
        assert_eq!(map["colors"]["green"], "moss");
        assert_eq!(map["retract"]["landinggear"], true);
        assert_eq!(map["_"], json!(["w00t"]));
    }
}
