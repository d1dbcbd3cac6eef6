//! `skillsync list`: show every skill, where it lives, and whether its
//! upstream has moved.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use skillsync_core::platform::discover;
use skillsync_core::{GitCli, Inventory, LocationState, SyncConfig, UpdateProber, UpdateStatus};

use crate::cli::ListArgs;
use crate::helpers;

pub async fn cmd_list(config: SyncConfig, args: ListArgs) -> Result<()> {
    let platforms = discover(&config, helpers::scan_mode(args.local));
    let inventory =
        Inventory::collect(&config, &platforms).context("failed to read skill locations")?;

    let git_skills = inventory.git_skills();
    let updates = if args.no_updates || git_skills.is_empty() {
        HashMap::new()
    } else {
        let prober = UpdateProber::new(Arc::new(GitCli::new(config.command_timeout)), &config);
        prober.probe_many(git_skills).await
    };

    let stdout = io::stdout();
    render(&inventory, &updates, &mut stdout.lock())?;
    Ok(())
}

fn marker(state: &LocationState) -> &'static str {
    match state {
        LocationState::OwnedSymlink => "[+]",
        LocationState::ForeignSymlink { .. } => "[~]",
        LocationState::BrokenSymlink => "[!]",
        LocationState::ForeignDirectory => "[=]",
        LocationState::Absent => "[-]",
    }
}

/// Write the listing for `inventory`. `updates` holds probe results for
/// git-backed skills; a missing entry means no check was made.
pub fn render(
    inventory: &Inventory,
    updates: &HashMap<String, UpdateStatus>,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(out)?;
    if inventory.is_empty() {
        writeln!(out, "  No skills found.")?;
        writeln!(out)?;
        writeln!(out, "  Central Repo: {}", inventory.repo_root.display())?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "  All Skills ({} total)", inventory.skills.len())?;
    writeln!(out, "  {}", "=".repeat(76))?;

    for skill in &inventory.skills {
        writeln!(out)?;
        writeln!(out, "  {}", skill.name)?;

        if skill.in_repo() {
            writeln!(out, "    {:18} [+] {}", "Repo:", skill.repo.path.display())?;
        } else {
            writeln!(out, "    {:18} [-] not in central repo", "Repo:")?;
        }
        if skill.git_backed {
            let status = updates
                .get(&skill.name)
                .map_or_else(|| "not checked".to_owned(), ToString::to_string);
            let flag = if updates.get(&skill.name).is_some_and(UpdateStatus::has_update) {
                "[^]"
            } else {
                "   "
            };
            writeln!(out, "    {:18} {flag} {status}", "Upstream:")?;
        }

        for loc in &skill.platforms {
            writeln!(out, "    {:18} {} {}", loc.name, marker(&loc.state), loc.state)?;
        }
        for path in &skill.drift {
            writeln!(out, "    {:18} [!] recorded target missing: {path}", "Ledger:")?;
        }
    }

    let summary = inventory.summary();
    writeln!(out)?;
    writeln!(out, "  {}", "=".repeat(76))?;
    writeln!(out)?;
    writeln!(out, "  Summary")?;
    writeln!(out, "    Total skills:           {}", summary.total)?;
    writeln!(out, "    In central repo:        {}", summary.in_repo)?;
    writeln!(out, "    Synced to 1+ platforms: {}", summary.synced)?;
    writeln!(out, "    Git-backed:             {}", summary.git_backed)?;
    let behind = updates.values().filter(|s| s.has_update()).count();
    if behind > 0 {
        writeln!(out, "    Updates available:      {behind}")?;
    }
    if summary.drifted > 0 {
        writeln!(out, "    With ledger drift:      {}", summary.drifted)?;
    }

    writeln!(out)?;
    writeln!(out, "  Platform Paths")?;
    writeln!(out, "    {:18} {}", "Central Repo", inventory.repo_root.display())?;
    for platform in &inventory.platforms {
        writeln!(out, "    {:18} {}", platform.name, platform.root.display())?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use skillsync_core::Platform;

    use super::*;

    fn rendered(inv: &Inventory, updates: &HashMap<String, UpdateStatus>) -> String {
        let mut buf = Vec::new();
        render(inv, updates, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_listing_names_the_repo() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SyncConfig::new(tmp.path(), tmp.path()).with_repo_root(tmp.path().join("repo"));
        let inv = Inventory::collect(&cfg, &[]).unwrap();
        let text = rendered(&inv, &HashMap::new());
        assert!(text.contains("No skills found."));
        assert!(text.contains(&tmp.path().join("repo").display().to_string()));
    }

    #[test]
    fn listing_shows_states_updates_and_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SyncConfig::new(tmp.path(), tmp.path()).with_repo_root(tmp.path().join("repo"));
        let claude = Platform::new("claude", "Claude Code", tmp.path().join("claude"));

        let canonical = cfg.canonical_path("writer");
        std::fs::create_dir_all(canonical.join(".git")).unwrap();
        std::fs::create_dir_all(tmp.path().join("claude")).unwrap();
        std::os::unix::fs::symlink(&canonical, tmp.path().join("claude/writer")).unwrap();
        std::fs::create_dir_all(tmp.path().join("claude/local-only")).unwrap();

        let inv = Inventory::collect(&cfg, &[claude]).unwrap();
        let updates = HashMap::from([(
            "writer".to_owned(),
            UpdateStatus::Behind { commits: 3, ahead: 0 },
        )]);
        let text = rendered(&inv, &updates);

        assert!(text.contains("All Skills (2 total)"));
        assert!(text.contains("[+] synced"));
        assert!(text.contains("[=] local directory (not synced)"));
        assert!(text.contains("[^] 3 update(s) available"));
        assert!(text.contains("In central repo:        1"));
        assert!(text.contains("Updates available:      1"));
        assert!(text.contains("Claude Code"));
    }
}
