//! Skill locations: the repository slot plus one slot per platform.

use std::fmt;
use std::path::PathBuf;

use crate::config::SyncConfig;
use crate::platform::Platform;
use crate::probe::{LocationState, probe, resolve};

/// Identifies where a skill copy or link lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationId {
    /// The central repository.
    Repo,
    /// A platform, by id.
    Platform(String),
}

impl LocationId {
    pub fn is_repo(&self) -> bool {
        matches!(self, Self::Repo)
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repo => f.write_str("repo"),
            Self::Platform(id) => f.write_str(id),
        }
    }
}

/// A resolved, probed location of one skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    /// Display name (`Central Repo` or the platform name).
    pub name: String,
    pub path: PathBuf,
    pub state: LocationState,
}

/// Probe the repository slot and every platform slot for `skill`, in
/// repository-then-registry order. Absent slots are included.
pub fn survey(config: &SyncConfig, skill: &str, platforms: &[Platform]) -> Vec<Location> {
    let canonical = config.canonical_path(skill);
    let expected = resolve(&canonical);
    let mut out = Vec::with_capacity(platforms.len() + 1);

    out.push(Location {
        id: LocationId::Repo,
        name: "Central Repo".to_owned(),
        state: probe(&canonical, Some(&expected)),
        path: canonical.clone(),
    });

    for platform in platforms {
        let path = platform.skill_path(skill);
        out.push(Location {
            id: LocationId::Platform(platform.id.clone()),
            name: platform.name.clone(),
            state: probe(&path, Some(&expected)),
            path,
        });
    }

    out
}

/// Like [`survey`], keeping only occupied slots.
pub fn present(config: &SyncConfig, skill: &str, platforms: &[Platform]) -> Vec<Location> {
    survey(config, skill, platforms)
        .into_iter()
        .filter(|l| l.state.is_present())
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn survey_orders_repo_first() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SyncConfig::new(tmp.path(), tmp.path()).with_repo_root(tmp.path().join("repo"));
        std::fs::create_dir_all(cfg.canonical_path("foo")).unwrap();
        let a = Platform::new("a", "A", tmp.path().join("a"));
        let b = Platform::new("b", "B", tmp.path().join("b"));
        std::fs::create_dir_all(&b.root).unwrap();
        std::os::unix::fs::symlink(cfg.canonical_path("foo"), b.skill_path("foo")).unwrap();

        let all = survey(&cfg, "foo", &[a.clone(), b.clone()]);
        let ids: Vec<_> = all.iter().map(|l| l.id.to_string()).collect();
        assert_eq!(ids, ["repo", "a", "b"]);
        assert_eq!(all[1].state, LocationState::Absent);
        assert_eq!(all[2].state, LocationState::OwnedSymlink);

        let found = present(&cfg, "foo", &[a, b]);
        assert_eq!(found.len(), 2);
        assert!(found[0].id.is_repo());
    }
}
