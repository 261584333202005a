use clap::{Args, Parser, ValueEnum};
use dragon_rockets::{
    db::memory::{MissionStore, RocketStore},
    init_logging,
    registry::DragonRockets,
    script,
};
use std::path::PathBuf;

/// Manage a fleet of Dragon rockets and print a summary of their missions.
#[derive(Parser)]
enum Command {
    /// Apply a script of registry operations to an empty registry.
    Run {
        /// The JSON file containing the script.
        ///
        /// The script is an array of commands, each tagged by an `op` field, for example
        ///
        ///     [
        ///         { "op": "add_rocket", "name": "Dragon 1" },
        ///         { "op": "add_mission", "name": "Luna1" },
        ///         { "op": "assign", "rocket": "Dragon 1", "mission": "Luna1" }
        ///     ]
        #[clap(value_name = "SCRIPT")]
        script: PathBuf,

        /// Log failing commands and carry on instead of stopping at the first failure.
        ///
        /// The environment variable accepts the usual spellings, like `1`, `yes` or `false`.
        #[clap(
            short,
            long,
            env = "DRAGONS_KEEP_GOING",
            action = clap::ArgAction::SetTrue,
            value_parser = clap::builder::BoolishValueParser::new(),
        )]
        keep_going: bool,

        #[clap(flatten)]
        output: Output,
    },
    /// Print the summary of a sample fleet.
    Demo {
        #[clap(flatten)]
        output: Output,
    },
}

/// Output options.
#[derive(Clone, Debug, Args)]
struct Output {
    /// How to print the summary.
    #[clap(short, long, env = "DRAGONS_FORMAT", value_enum, default_value = "text")]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[async_std::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logging();

    let (steps, keep_going, output) = match Command::parse() {
        Command::Run {
            script,
            keep_going,
            output,
        } => (script::load(script)?, keep_going, output),
        Command::Demo { output } => (script::demo(), false, output),
    };
    tracing::info!("{} commands to apply", steps.len());

    let registry = DragonRockets::new(RocketStore::create(), MissionStore::create());
    let failed = script::run(&registry, &steps, keep_going).await?;
    if failed > 0 {
        tracing::warn!("{failed} of {} commands failed", steps.len());
    }

    let summary = registry.summary().await?;
    match output.format {
        Format::Text => print!("{summary}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}
