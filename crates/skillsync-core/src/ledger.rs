//! Sync ledger: the persisted record of what was synced where.
//!
//! The ledger is a cache of derivable truth: the filesystem always wins. It
//! lives at `<repo_root>/.skill_sync_metadata.json` as pretty-printed JSON:
//!
//! ```json
//! {
//!   "foo": {
//!     "source": "/home/u/.skill_repo/foo",
//!     "targets": ["/home/u/.claude/skills/foo"]
//!   }
//! }
//! ```
//!
//! Every [`Ledger::save`] first drops targets that neither exist nor are
//! symlinks, so entries for links removed by other means disappear on the
//! next write. Nothing sweeps the ledger outside of a save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::fsops::exists_or_symlink;

/// One skill's sync record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Canonical repository path.
    pub source: String,

    /// Platform paths believed to link to `source`.
    #[serde(default)]
    pub targets: Vec<String>,
}

/// All sync records, keyed by skill name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: BTreeMap<String, LedgerEntry>,
}

impl Ledger {
    /// Read the ledger, failing on unreadable or unparsable files.
    ///
    /// A missing file is an empty ledger.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(SyncError::io(path, e)),
        };

        serde_json::from_str(&content).map_err(|e| SyncError::MalformedLedger {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Read the ledger, treating a malformed file as empty.
    pub fn load(path: &Path) -> Result<Self> {
        match Self::try_load(path) {
            Err(e @ SyncError::MalformedLedger { .. }) => {
                tracing::warn!(error = %e, "ignoring malformed ledger");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Prune dead targets and write the whole file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let pruned = self.prune();
        if pruned > 0 {
            tracing::debug!(pruned, "dropped dead ledger targets");
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json).map_err(|e| SyncError::io(path, e))?;

        tracing::debug!(path = %path.display(), skills = self.entries.len(), "ledger saved");
        Ok(())
    }

    pub fn get(&self, skill: &str) -> Option<&LedgerEntry> {
        self.entries.get(skill)
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.entries.contains_key(skill)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LedgerEntry)> {
        self.entries.iter()
    }

    /// Record an install, merging `targets` into whatever was recorded
    /// before.
    pub fn record_install(&mut self, skill: &str, source: &Path, targets: &[PathBuf]) {
        let entry = self.entries.entry(skill.to_owned()).or_default();
        entry.source = path_string(source);
        for target in targets {
            let target = path_string(target);
            if !entry.targets.contains(&target) {
                entry.targets.push(target);
            }
        }
    }

    /// Drop the whole entry for `skill`.
    pub fn remove(&mut self, skill: &str) -> Option<LedgerEntry> {
        self.entries.remove(skill)
    }

    /// Drop exactly the given targets from `skill`'s entry.
    pub fn forget_targets(&mut self, skill: &str, removed: &[PathBuf]) {
        if let Some(entry) = self.entries.get_mut(skill) {
            let removed: Vec<String> = removed.iter().map(|p| path_string(p)).collect();
            entry.targets.retain(|t| !removed.contains(t));
        }
    }

    /// Drop targets that neither exist nor are symlinks. Returns how many
    /// were dropped.
    pub fn prune(&mut self) -> usize {
        let mut dropped = 0;
        for entry in self.entries.values_mut() {
            let before = entry.targets.len();
            entry.targets.retain(|t| exists_or_symlink(Path::new(t)));
            dropped += before - entry.targets.len();
        }
        dropped
    }

    /// Recorded targets of `skill` that no longer exist on disk.
    pub fn drift(&self, skill: &str) -> Vec<&str> {
        self.entries
            .get(skill)
            .map(|e| {
                e.targets
                    .iter()
                    .filter(|t| !exists_or_symlink(Path::new(t)))
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
