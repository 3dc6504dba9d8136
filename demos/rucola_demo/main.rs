//! # rucola demo application
//!
//! A sample CLI tool showing how an app wires rucola into clap. It prints the
//! merged configuration, or a single dotted key.
//!
//! ```sh
//! cargo run --example rucola_demo
//! cargo run --example rucola_demo -- colors.green
//! ```
//!
//! | Layer                | How to exercise it                                            |
//! |----------------------|---------------------------------------------------------------|
//! | Built-in defaults    | `cargo run --example rucola_demo`                             |
//! | rc file              | Put `colors.green = lime` in `~/.rucolademorc` or `./.rucolademorc` |
//! | Env var override     | `RUCOLADEMO_COLORS_GREEN=jade cargo run --example rucola_demo` |
//! | CLI flag             | `cargo run --example rucola_demo -- --colors-green moss`      |
//! | Explicit file        | `cargo run --example rucola_demo -- --config ./demo.yml`      |

use clap::{CommandFactory, FromArgMatches, Parser};
use serde_json::json;

use rucola::{ConfigMap, ParsedArgs, Rucola};

/// rucola demo: print the merged configuration.
#[derive(Parser, Debug)]
#[command(name = "rucola-demo")]
struct Cli {
    /// Print only this dotted key.
    key: Option<String>,

    /// Override colors.green.
    #[arg(long = "colors-green")]
    colors_green: Option<String>,

    /// Extra config file, highest-priority file layer.
    #[arg(long)]
    config: Option<String>,

    /// Show which files were read.
    #[arg(long)]
    sources: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cmd = Cli::command();
    let matches = cmd.clone().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let mut args = ParsedArgs::from_clap(&cmd, &matches);
    // The positional selects output; keep it out of the `_` layer.
    args.positional.clear();
    args.flags.remove("sources");

    let config = Rucola::builder()
        .app_name("rucolademo")
        .defaults(ConfigMap::from_iter([(
            "colors".to_string(),
            json!({"blue": "#0000FF", "green": "#00FF00", "red": "#FF0000"}),
        )]))
        .args(args)
        .load()?;

    if cli.sources {
        for path in config.checked_configs() {
            let mark = if config.used_configs().contains(path) { "*" } else { " " };
            println!("{mark} {}", path.display());
        }
        println!();
    }

    match cli.key.as_deref() {
        Some(key) => match config.get(key) {
            Some(value) => println!("{key} = {value}"),
            None => println!("{key} is not set"),
        },
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
