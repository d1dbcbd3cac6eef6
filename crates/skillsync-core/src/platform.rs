//! Platform registry: resolves which integration directories are usable on
//! this host.
//!
//! Discovery is a pure read: a platform is *available* when the parent of its
//! resolved root exists (e.g. `~/.claude` for `~/.claude/skills`). The skills
//! directory itself is created lazily on first install.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{PlatformSpec, SyncConfig};

/// Which platform roots to resolve.
///
/// The two modes are never merged: a platform present in both is two
/// independent location contexts, scanned in separate runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Roots under the user's home directory.
    #[default]
    Global,
    /// Roots under the current working directory.
    Local,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// An available platform with its resolved root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Stable identifier (e.g. `claude`).
    pub id: String,

    /// Human-readable name (e.g. `Claude Code`).
    pub name: String,

    /// Absolute directory that holds this platform's skills.
    pub root: PathBuf,
}

impl Platform {
    pub fn new(id: impl Into<String>, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            root: root.into(),
        }
    }

    /// Location of `skill` inside this platform.
    pub fn skill_path(&self, skill: &str) -> PathBuf {
        self.root.join(skill)
    }
}

/// Resolve a spec's root for the given mode.
pub fn resolve_root(config: &SyncConfig, spec: &PlatformSpec, mode: ScanMode) -> PathBuf {
    match mode {
        ScanMode::Global => config.home_dir.join(&spec.global),
        ScanMode::Local => config.work_dir.join(&spec.local),
    }
}

/// Enumerate available platforms in configuration order.
pub fn discover(config: &SyncConfig, mode: ScanMode) -> Vec<Platform> {
    let platforms: Vec<Platform> = config
        .platforms
        .iter()
        .filter_map(|spec| {
            let root = resolve_root(config, spec, mode);
            if parent_exists(&root) {
                Some(Platform::new(&spec.id, &spec.name, root))
            } else {
                tracing::trace!(
                    platform = %spec.id,
                    root = %root.display(),
                    "platform not present"
                );
                None
            }
        })
        .collect();

    tracing::debug!(mode = %mode, count = platforms.len(), "platforms discovered");
    platforms
}

fn parent_exists(root: &Path) -> bool {
    root.parent().is_some_and(|p| p.is_dir())
}
