//! CLI entry point for skillsync.
//!
//! This binary provides the `skillsync` command with subcommands for
//! installing, listing, uninstalling, and updating skills.

mod cli;
mod helpers;
mod install;
mod list;
mod prompt;
mod uninstall;
mod update;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    helpers::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let config = helpers::load_config(cli.repo_dir)?;
    debug!(repo = %config.repo_root.display(), "configuration resolved");

    match cli.command {
        Commands::Install(args) => install::cmd_install(config, args),
        Commands::List(args) => list::cmd_list(config, args).await,
        Commands::Uninstall(args) => uninstall::cmd_uninstall(config, args),
        Commands::Update(args) => update::cmd_update(config, args),
    }
}
