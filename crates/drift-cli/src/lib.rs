mod config;
pub use config::{Config, MigrationConfig};

mod generate;
pub use generate::GenerateCommand;

mod rollback;
pub use rollback::RollbackCommand;

mod snapshot_file;
pub use snapshot_file::JsonSnapshotStore;

use std::ffi::OsString;

use clap::Parser;
use drift_core::Model;

#[derive(Debug, Parser)]
#[command(name = "drift", about = "Schema migration generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Generate a migration from the declared models.
    Generate(GenerateCommand),
    /// Undo the most recently generated migration.
    Rollback(RollbackCommand),
}

/// Embeddable CLI over a declared model set.
///
/// Applications hand their models to `DriftCli` and call
/// [`parse_and_run`](DriftCli::parse_and_run) from `main`;
/// [`parse_from`](DriftCli::parse_from) serves embedding and tests.
pub struct DriftCli<'a> {
    models: &'a [&'a dyn Model],
    config: Config,
}

impl<'a> DriftCli<'a> {
    pub fn new(models: &'a [&'a dyn Model]) -> Self {
        Self {
            models,
            config: Config::default(),
        }
    }

    pub fn with_config(models: &'a [&'a dyn Model], config: Config) -> Self {
        Self { models, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses process arguments and runs the selected command.
    pub fn parse_and_run(&self) -> anyhow::Result<()> {
        self.run(Cli::parse())
    }

    /// Parses the given arguments and runs the selected command.
    pub fn parse_from<I, T>(&self, args: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.run(Cli::parse_from(args))
    }

    fn run(&self, cli: Cli) -> anyhow::Result<()> {
        match cli.command {
            Command::Generate(cmd) => cmd.run(self.models, &self.config),
            Command::Rollback(cmd) => cmd.run(&self.config),
        }
    }
}
