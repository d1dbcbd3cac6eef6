//! Skill discovery: the union of every skill name visible on the host.

use std::collections::BTreeSet;
use std::path::Path;

use crate::platform::Platform;

/// Whether a directory entry name is hidden.
///
/// Hidden entries are never skills; this keeps the ledger, the config file,
/// and staging directories out of the universe.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Names of every non-hidden top-level directory in the repository plus every
/// non-hidden directory or symlink in each platform root.
pub fn discover_all(repo_root: &Path, platforms: &[Platform]) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();

    collect(repo_root, false, &mut skills);
    for platform in platforms {
        collect(&platform.root, true, &mut skills);
    }

    tracing::debug!(count = skills.len(), "skills discovered");
    skills
}

/// Names of the non-hidden top-level directories in the repository only.
pub fn repo_skills(repo_root: &Path) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();
    collect(repo_root, false, &mut skills);
    skills
}

fn collect(dir: &Path, include_symlinks: bool, into: &mut BTreeSet<String>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "cannot read directory, skipping");
            return;
        }
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }

        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let is_dir = if file_type.is_symlink() {
            include_symlinks || entry.path().is_dir()
        } else {
            file_type.is_dir()
        };

        if is_dir {
            into.insert(name);
        }
    }
}
