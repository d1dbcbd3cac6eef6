//! Read-only inventory of every known skill and where it lives.

use std::path::PathBuf;

use crate::config::SyncConfig;
use crate::discovery::discover_all;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::location::{Location, survey};
use crate::platform::Platform;
use crate::probe::LocationState;
use crate::vcs::is_git_repo;

/// Status of one skill across the repository and every platform.
#[derive(Debug, Clone)]
pub struct SkillStatus {
    pub name: String,
    /// The repository slot.
    pub repo: Location,
    /// One slot per platform, in registry order.
    pub platforms: Vec<Location>,
    /// Whether the repository copy is a git working tree.
    pub git_backed: bool,
    /// Ledger targets that no longer exist on disk.
    pub drift: Vec<String>,
}

impl SkillStatus {
    pub fn in_repo(&self) -> bool {
        self.repo.state.is_present()
    }

    /// Number of platforms holding an owned link.
    pub fn synced_count(&self) -> usize {
        self.platforms
            .iter()
            .filter(|l| l.state == LocationState::OwnedSymlink)
            .count()
    }
}

/// Aggregate counts over an [`Inventory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub in_repo: usize,
    /// Skills linked into at least one platform.
    pub synced: usize,
    pub git_backed: usize,
    /// Skills with at least one drifted ledger target.
    pub drifted: usize,
}

/// Snapshot of every skill, sorted by name.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub repo_root: PathBuf,
    pub platforms: Vec<Platform>,
    pub skills: Vec<SkillStatus>,
}

impl Inventory {
    /// Survey the repository and `platforms`. Never writes; the ledger is
    /// only read to report drift.
    pub fn collect(config: &SyncConfig, platforms: &[Platform]) -> Result<Self> {
        let ledger = Ledger::load(&config.ledger_path())?;
        let names = discover_all(&config.repo_root, platforms);

        let skills: Vec<SkillStatus> = names
            .into_iter()
            .map(|name| {
                let mut slots = survey(config, &name, platforms);
                // `survey` always yields the repository slot first.
                let repo = slots.remove(0);
                let git_backed = is_git_repo(&repo.path);
                let drift = ledger.drift(&name).into_iter().map(str::to_owned).collect();
                SkillStatus {
                    name,
                    repo,
                    platforms: slots,
                    git_backed,
                    drift,
                }
            })
            .collect();

        tracing::debug!(skills = skills.len(), platforms = platforms.len(), "inventory collected");
        Ok(Self {
            repo_root: config.repo_root.clone(),
            platforms: platforms.to_vec(),
            skills,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Repository skills that are git working trees, for update probing.
    pub fn git_skills(&self) -> Vec<(String, PathBuf)> {
        self.skills
            .iter()
            .filter(|s| s.git_backed)
            .map(|s| (s.name.clone(), s.repo.path.clone()))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        self.skills.iter().fold(
            Summary {
                total: self.skills.len(),
                ..Summary::default()
            },
            |mut acc, s| {
                acc.in_repo += usize::from(s.in_repo());
                acc.synced += usize::from(s.synced_count() > 0);
                acc.git_backed += usize::from(s.git_backed);
                acc.drifted += usize::from(!s.drift.is_empty());
                acc
            },
        )
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::symlink;

    use super::*;

    #[test]
    fn inventory_reports_every_state() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SyncConfig::new(tmp.path(), tmp.path()).with_repo_root(tmp.path().join("repo"));
        let a = Platform::new("a", "A", tmp.path().join("a"));
        let b = Platform::new("b", "B", tmp.path().join("b"));

        // `synced`: in repo, linked into A.
        let synced = cfg.canonical_path("synced");
        std::fs::create_dir_all(synced.join(".git")).unwrap();
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        symlink(&synced, tmp.path().join("a/synced")).unwrap();
        // `local`: only a real directory on B.
        std::fs::create_dir_all(tmp.path().join("b/local")).unwrap();

        let mut ledger = Ledger::default();
        ledger.record_install(
            "synced",
            &synced,
            &[tmp.path().join("a/synced"), tmp.path().join("b/synced")],
        );
        // Written directly so the dead target is not pruned.
        std::fs::write(cfg.ledger_path(), serde_json::to_string(&ledger).unwrap()).unwrap();

        let inv = Inventory::collect(&cfg, &[a, b]).unwrap();
        let names: Vec<_> = inv.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["local", "synced"]);

        let local = &inv.skills[0];
        assert!(!local.in_repo());
        assert_eq!(local.platforms[0].state, LocationState::Absent);
        assert_eq!(local.platforms[1].state, LocationState::ForeignDirectory);

        let s = &inv.skills[1];
        assert!(s.in_repo());
        assert!(s.git_backed);
        assert_eq!(s.synced_count(), 1);
        assert_eq!(s.drift, [tmp.path().join("b/synced").to_str().unwrap()]);

        assert_eq!(
            inv.summary(),
            Summary {
                total: 2,
                in_repo: 1,
                synced: 1,
                git_backed: 1,
                drifted: 1,
            }
        );
        assert_eq!(inv.git_skills(), [("synced".to_string(), synced)]);
    }

    #[test]
    fn empty_inventory() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SyncConfig::new(tmp.path(), tmp.path()).with_repo_root(tmp.path().join("repo"));
        let inv = Inventory::collect(&cfg, &[]).unwrap();
        assert!(inv.is_empty());
        assert_eq!(inv.summary(), Summary::default());
    }
}
