//! macup — keep a macOS developer workstation up to date.
//!
//! # Usage
//!
//! ```text
//! macup [run] [--yes] [--non-interactive] [--config <path>]
//! macup list [--json] [--config <path>]
//! ```

mod commands;
mod prompt;
mod render;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};

use commands::{list::ListArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "macup",
    version,
    about = "Run Homebrew, editor, language and macOS updates in one go",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Flags for the default `run` command.
    #[command(flatten)]
    run: RunArgs,

    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select and run updates (the default).
    Run(RunArgs),

    /// Show the available updates and the saved selection.
    List(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let mut command = Cli::command();
    let matches = command.get_matches_mut();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    if cli.command.is_some() {
        if let Some(flag) = run_flag_on_command_line(&command, &matches) {
            command
                .error(
                    ErrorKind::ArgumentConflict,
                    format!("'{flag}' belongs to the default run; pass it after 'run' instead"),
                )
                .exit();
        }
    }
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Commands::Run(cli.run)) {
        Commands::Run(args) => args.run(),
        Commands::List(args) => args.run(),
    }
}

/// First top-level `run` flag the user typed. Global flags such as
/// `--verbose` may precede any subcommand.
fn run_flag_on_command_line(command: &clap::Command, matches: &ArgMatches) -> Option<String> {
    command
        .get_arguments()
        .filter(|arg| !arg.is_global_set())
        .find(|arg| matches.value_source(arg.get_id().as_str()) == Some(ValueSource::CommandLine))
        .map(|arg| match arg.get_long() {
            Some(long) => format!("--{long}"),
            None => arg.get_id().to_string(),
        })
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
