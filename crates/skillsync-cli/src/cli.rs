//! CLI argument definitions for skillsync.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// skillsync -- one skill repository, every AI coding platform.
#[derive(Parser)]
#[command(
    name = "skillsync",
    version,
    about = "skillsync -- keep AI agent skills in one repository, linked into every platform",
    long_about = "Stores each skill once in a central repository and exposes it to Claude Code, \
                  Copilot, Cursor, Codex, Gemini and other platforms through symlinks."
)]
pub struct Cli {
    /// Central repository directory. Overrides `SKILLSYNC_REPO`.
    #[arg(long, global = true, value_name = "DIR")]
    pub repo_dir: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install a skill from a directory, a .skill/.zip archive, or a git URL.
    Install(InstallArgs),

    /// List every known skill and where it is installed.
    List(ListArgs),

    /// Remove a skill from the repository and/or platforms.
    Uninstall(UninstallArgs),

    /// Fast-forward git-backed skills from their upstream.
    Update(UpdateArgs),
}

#[derive(Args)]
pub struct InstallArgs {
    /// Local path or git URL.
    pub source: String,

    /// Use project-local platform directories instead of the home directory.
    #[arg(long)]
    pub local: bool,

    /// Link into this platform id (repeatable). Skips the selection prompt.
    #[arg(long = "platform", short, value_name = "ID")]
    pub platforms: Vec<String>,

    /// Link into every available platform. Skips the selection prompt.
    #[arg(long, conflicts_with = "platforms")]
    pub all_platforms: bool,

    /// Replace conflicting content without asking.
    #[arg(long, short)]
    pub force: bool,

    /// Never prompt: link into every platform and abort on conflicts
    /// unless `--force` is given.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Use project-local platform directories.
    #[arg(long)]
    pub local: bool,

    /// Skip remote update checks for git-backed skills.
    #[arg(long)]
    pub no_updates: bool,
}

#[derive(Args)]
pub struct UninstallArgs {
    /// Skill name.
    pub name: String,

    /// Use project-local platform directories.
    #[arg(long)]
    pub local: bool,

    /// Remove the central repository copy.
    #[arg(long)]
    pub repo: bool,

    /// Remove from this platform id (repeatable).
    #[arg(long = "platform", short, value_name = "ID")]
    pub platforms: Vec<String>,

    /// Remove from every location.
    #[arg(long, conflicts_with_all = ["repo", "platforms"])]
    pub all: bool,

    /// Never prompt: without location flags, remove from every location.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Skills to update. Without names, choose interactively.
    pub names: Vec<String>,

    /// Update every git-backed skill without asking.
    #[arg(long, conflicts_with = "names")]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn uninstall_repo_flag_is_separate_from_repo_dir() {
        let cli = Cli::parse_from([
            "skillsync",
            "--repo-dir",
            "/srv/skills",
            "uninstall",
            "foo",
            "--repo",
            "-p",
            "claude",
        ]);
        assert_eq!(cli.repo_dir, Some(PathBuf::from("/srv/skills")));
        let Commands::Uninstall(args) = cli.command else {
            panic!("expected uninstall");
        };
        assert_eq!(args.name, "foo");
        assert!(args.repo);
        assert_eq!(args.platforms, ["claude"]);
        assert!(!args.all);
    }

    #[test]
    fn platform_flags_conflict_with_all_platforms() {
        let err = Cli::try_parse_from([
            "skillsync",
            "install",
            "./foo",
            "--platform",
            "claude",
            "--all-platforms",
        ]);
        assert!(err.is_err());
    }
}
