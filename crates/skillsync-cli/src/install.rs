//! `skillsync install`: store a skill in the repository and link it into
//! platforms.

use anyhow::{Context, Result, bail};
use skillsync_core::{
    InstallOutcome, InstallReport, Platform, RepoAction, SkillSource, SyncConfig, TargetChoice,
};
use tracing::info;

use crate::cli::InstallArgs;
use crate::helpers;

pub fn cmd_install(config: SyncConfig, args: InstallArgs) -> Result<()> {
    let source = SkillSource::parse(&args.source, &config.work_dir)
        .with_context(|| format!("cannot install from `{}`", args.source))?;
    let reconciler = helpers::reconciler(config, args.local);

    let mut decider = helpers::terminal();
    if args.all_platforms {
        decider = decider.with_targets(TargetChoice::All);
    } else if !args.platforms.is_empty() {
        decider = decider.with_targets(TargetChoice::Only(args.platforms));
    }
    if args.yes {
        decider = decider.non_interactive();
    }

    println!();
    println!("  Installing `{}` from {source}", source.name());

    let outcome = reconciler
        .install(&source, args.force, &mut decider)
        .with_context(|| format!("failed to install `{}`", source.name()))?;

    match outcome {
        InstallOutcome::Declined { conflicts } => {
            info!(skill = %source.name(), conflicts = conflicts.len(), "install declined");
            println!("  Installation cancelled. Nothing was changed.");
            println!();
            Ok(())
        }
        InstallOutcome::Installed(report) => {
            print_report(&report, reconciler.platforms());
            if !report.failed.is_empty() {
                bail!("{} platform link(s) could not be created", report.failed.len());
            }
            Ok(())
        }
    }
}

fn print_report(report: &InstallReport, platforms: &[Platform]) {
    let repo = match report.repo {
        RepoAction::Unchanged => "already in repository",
        RepoAction::Created => "stored",
        RepoAction::Replaced => "replaced",
    };
    println!("  [+] Repository: {} ({repo})", report.canonical.display());

    let name_of = |path: &std::path::Path| {
        platforms
            .iter()
            .find(|p| p.skill_path(&report.skill) == path)
            .map_or_else(|| path.display().to_string(), |p| p.name.clone())
    };

    if report.linked.is_empty() && report.unchanged.is_empty() && report.failed.is_empty() {
        println!("      No platforms selected.");
    }
    for path in &report.linked {
        let note = if report.replaced.contains(path) { " (replaced)" } else { "" };
        println!("  [+] {:18} {}{note}", name_of(path), path.display());
    }
    for path in &report.unchanged {
        println!("  [=] {:18} {} (already linked)", name_of(path), path.display());
    }
    for (path, reason) in &report.failed {
        println!("  [!] {:18} {}: {reason}", name_of(path), path.display());
    }

    println!();
    println!("  Done.");
    println!();
}
