use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{config, Error};

mod run;
use run::Run;
mod show;
use show::Show;

/// Round your Monzo balance down and save the change
#[derive(Debug, Parser)]
#[clap(version, about, subcommand_negates_reqs = true)]
pub struct App {
    /// Increase logging verbosity (repeat for more)
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbose: u8,

    /// Path to the config file, instead of the default location
    #[clap(long, short, global = true)]
    config: Option<PathBuf>,

    /// Options for `run`, which is what happens when no subcommand is given
    #[clap(flatten)]
    run: Run,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Move the rounding remainder into the pot
    Run(Run),

    /// Print the effective configuration
    Show(Show),
}

impl App {
    pub fn from_cli() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub async fn run(self) -> Result<(), Error> {
        let settings = config::settings(self.config.as_deref())?;

        match self.command.unwrap_or(Command::Run(self.run)) {
            Command::Run(run) => run.run(settings).await,
            Command::Show(show) => {
                show.run(&settings);
                Ok(())
            }
        }
    }
}
