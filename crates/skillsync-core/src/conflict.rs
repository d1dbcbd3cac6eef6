//! Conflict classifier: which locations an install would overwrite.
//!
//! A location conflicts when something occupies it that is not an owned
//! symlink to the skill's canonical repository path. Owned symlinks are a
//! no-op on re-sync, so re-running an install never reports them.

use std::path::Path;

use crate::config::SyncConfig;
use crate::location::{Location, LocationId, survey};
use crate::platform::Platform;

/// Conflicting locations for installing `skill` from `candidate` into the
/// repository and the given platforms.
///
/// The repository comes first, then platforms in the order given. When
/// `candidate` already is the canonical path (re-installing from the
/// repository), the repository slot is not a conflict.
pub fn classify(
    config: &SyncConfig,
    skill: &str,
    candidate: Option<&Path>,
    platforms: &[Platform],
) -> Vec<Location> {
    let self_install = candidate.is_some_and(|c| is_self_install(config, skill, c));

    survey(config, skill, platforms)
        .into_iter()
        .filter(|loc| match loc.id {
            LocationId::Repo => loc.state.is_present() && !self_install,
            LocationId::Platform(_) => !loc.state.is_safe(),
        })
        .collect()
}

/// Whether `candidate` resolves to the skill's canonical repository path.
pub fn is_self_install(config: &SyncConfig, skill: &str, candidate: &Path) -> bool {
    let canonical = config.canonical_path(skill);
    match (std::fs::canonicalize(candidate), std::fs::canonicalize(&canonical)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
