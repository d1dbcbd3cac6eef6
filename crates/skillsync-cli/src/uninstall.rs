//! `skillsync uninstall`: remove a skill from selected locations.

use anyhow::{Context, Result, bail};
use skillsync_core::{LocationId, RemovalChoice, SyncConfig, UninstallOutcome};

use crate::cli::UninstallArgs;
use crate::helpers;

pub fn cmd_uninstall(config: SyncConfig, args: UninstallArgs) -> Result<()> {
    let reconciler = helpers::reconciler(config, args.local);

    for id in &args.platforms {
        if !reconciler.platforms().iter().any(|p| &p.id == id) {
            bail!("platform `{id}` is not available");
        }
    }

    let found = reconciler
        .locations(&args.name)
        .with_context(|| format!("cannot uninstall `{}`", args.name))?;
    if found.is_empty() {
        bail!("skill `{}` not found in any location", args.name);
    }

    println!();
    println!("  Found `{}` in {} location(s):", args.name, found.len());
    for loc in &found {
        println!("    - {}: {} [{}]", loc.name, loc.path.display(), loc.state);
    }

    let mut decider = helpers::terminal();
    if args.all {
        decider = decider.with_removals(RemovalChoice::All);
    } else if args.repo || !args.platforms.is_empty() {
        let mut ids: Vec<LocationId> = Vec::new();
        if args.repo {
            ids.push(LocationId::Repo);
        }
        ids.extend(args.platforms.into_iter().map(LocationId::Platform));
        decider = decider.with_removals(RemovalChoice::Only(ids));
    }
    if args.yes {
        decider = decider.non_interactive();
    }

    let outcome = reconciler
        .uninstall(&args.name, &mut decider)
        .with_context(|| format!("failed to uninstall `{}`", args.name))?;

    println!();
    match outcome {
        UninstallOutcome::Cancelled => {
            println!("  Nothing selected. Nothing was removed.");
            println!();
            Ok(())
        }
        UninstallOutcome::Removed {
            removed,
            failed,
            ledger_entry_dropped,
        } => {
            for loc in &removed {
                println!("  [+] Removed from {}: {}", loc.name, loc.path.display());
            }
            for (loc, reason) in &failed {
                println!("  [!] Could not remove from {}: {reason}", loc.name);
            }
            if ledger_entry_dropped {
                println!("  [+] Removed from sync ledger");
            }
            println!();

            if !failed.is_empty() {
                bail!("{} location(s) could not be removed", failed.len());
            }
            println!("  Uninstall complete.");
            println!();
            Ok(())
        }
    }
}
