//! `skillsync update`: fast-forward git-backed skills.
//!
//! Each skill is pulled with `--ff-only`; whether anything changed is judged
//! by comparing `HEAD` before and after. One failing skill never stops the
//! rest.

use anyhow::{Result, bail};
use skillsync_core::{PullOutcome, Reconciler, SyncConfig};

use crate::cli::UpdateArgs;
use crate::helpers;

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    updated: usize,
    up_to_date: usize,
    errors: usize,
    skipped: usize,
    unknown: usize,
}

pub fn cmd_update(config: SyncConfig, args: UpdateArgs) -> Result<()> {
    let repo_root = config.repo_root.clone();
    let reconciler = helpers::reconciler(config, false);
    let git_skills: Vec<String> = reconciler
        .git_skills()
        .into_iter()
        .map(|(name, _)| name)
        .collect();

    println!();
    let selected: Vec<String> = if !args.names.is_empty() {
        args.names
    } else if git_skills.is_empty() {
        println!("  No git-backed skills in {}.", repo_root.display());
        println!();
        return Ok(());
    } else if args.all {
        git_skills
    } else {
        let mut decider = helpers::terminal();
        let picked = decider.choose("Select skills to update:", &git_skills, "All", &[])?;
        picked.into_iter().map(|i| git_skills[i].clone()).collect()
    };

    if selected.is_empty() {
        println!("  Nothing selected.");
        println!();
        return Ok(());
    }

    println!("  Checking for updates in {}", repo_root.display());
    println!();
    let tally = run_updates(&reconciler, &selected);

    println!();
    println!("  Summary");
    println!("    Updated:            {}", tally.updated);
    println!("    Up to date:         {}", tally.up_to_date);
    println!("    Errors:             {}", tally.errors);
    println!("    Skipped (non-git):  {}", tally.skipped);
    if tally.unknown > 0 {
        println!("    Not found/invalid:  {}", tally.unknown);
    }
    if tally.updated > 0 {
        println!();
        println!("  Platform links point at the repository copy, so no re-sync is needed.");
    }
    println!();

    if tally.errors > 0 || tally.unknown > 0 {
        bail!(
            "{} update(s) failed, {} skill(s) not found or invalid",
            tally.errors,
            tally.unknown
        );
    }
    Ok(())
}

fn run_updates(reconciler: &Reconciler, names: &[String]) -> Tally {
    let mut tally = Tally::default();
    for name in names {
        match reconciler.update(name) {
            Ok(PullOutcome::UpToDate) => {
                tally.up_to_date += 1;
                println!("  [=] {name:25} up to date");
            }
            Ok(PullOutcome::Updated { from, to }) => {
                tally.updated += 1;
                println!("  [+] {name:25} updated {} -> {}", short(&from), short(&to));
            }
            Ok(PullOutcome::Error { detail }) => {
                tally.errors += 1;
                println!("  [!] {name:25} update failed");
                for line in detail.lines() {
                    println!("        {line}");
                }
            }
            Ok(PullOutcome::Skipped) => {
                tally.skipped += 1;
                println!("  [-] {name:25} skipped (not a git repository)");
            }
            Err(e) => {
                tally.unknown += 1;
                println!("  [!] {name:25} {e}");
            }
        }
    }
    tally
}

fn short(rev: &str) -> &str {
    rev.get(..8).unwrap_or(rev)
}
