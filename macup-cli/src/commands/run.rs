//! `macup run` — connectivity check, selection, then every selected update.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use macup_runner::{
    connectivity::{DEFAULT_PROBE_TIMEOUT, DEFAULT_PROBE_URL},
    Catalog, HttpProbe, Orchestrator, PathResolver, RunError, RunOptions, SystemRunner,
};

use super::config_store;
use crate::prompt::{NonInteractive, TerminalPrompt};
use crate::render;

/// Arguments for `macup run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Reuse the previously saved selection without prompting.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Never prompt; fail when no selection has been saved.
    #[arg(long)]
    pub non_interactive: bool,

    /// Config file to read and update (default: ~/.macup.json).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// URL fetched to decide whether the machine is online.
    #[arg(long, hide = true, default_value = DEFAULT_PROBE_URL)]
    pub probe_url: String,

    /// Seconds before the connectivity probe gives up.
    #[arg(long, hide = true, default_value_t = DEFAULT_PROBE_TIMEOUT.as_secs())]
    pub probe_timeout_secs: u64,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let store = config_store(self.config.as_deref())?;
        let catalog = Catalog::standard();
        let probe = HttpProbe::new(
            self.probe_url.clone(),
            Duration::from_secs(self.probe_timeout_secs),
        );
        let orchestrator =
            Orchestrator::new(&catalog, &store, &probe, &SystemRunner, &PathResolver);
        let options = RunOptions {
            reuse_previous: self.yes || self.non_interactive,
        };

        let result = if self.non_interactive {
            orchestrator.run(&options, &mut NonInteractive)
        } else {
            let mut prompt = TerminalPrompt::new(io::stdin().lock(), io::stdout());
            orchestrator.run(&options, &mut prompt)
        };

        let report = match result {
            Ok(report) => report,
            Err(err @ RunError::NetworkUnavailable(_)) => {
                eprintln!("{}", "⚠️  No internet connection!".yellow().bold());
                return Err(err).context("updates need network access");
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("run aborted (config: {})", store.path().display()))
            }
        };

        print!("{}", render::report(&report));
        Ok(())
    }
}
