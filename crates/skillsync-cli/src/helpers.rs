//! Shared helpers for the command handlers.

use std::io::{self, StdinLock, Stdout};
use std::sync::Arc;

use anyhow::{Context, Result};
use skillsync_core::{GitCli, Reconciler, ScanMode, SyncConfig};
use tracing_subscriber::EnvFilter;

use crate::prompt::TerminalDecider;

/// Initialize the tracing subscriber with the given default log level.
///
/// Logs go to stderr so they never interleave with command output.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Resolve the runtime configuration, applying `--repo-dir` if given.
pub fn load_config(repo_dir: Option<std::path::PathBuf>) -> Result<SyncConfig> {
    SyncConfig::load(repo_dir).context("failed to load configuration")
}

pub fn scan_mode(local: bool) -> ScanMode {
    if local { ScanMode::Local } else { ScanMode::Global }
}

/// Build a reconciler over the platforms available in the chosen mode.
pub fn reconciler(config: SyncConfig, local: bool) -> Reconciler {
    let vcs = Arc::new(GitCli::new(config.command_timeout));
    Reconciler::new(config, scan_mode(local), vcs)
}

/// A decider reading stdin and writing prompts to stdout.
pub fn terminal() -> TerminalDecider<StdinLock<'static>, Stdout> {
    TerminalDecider::new(io::stdin().lock(), io::stdout())
}
