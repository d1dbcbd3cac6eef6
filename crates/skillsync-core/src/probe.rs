//! Location state prober: classifies a single filesystem path.

use std::fmt;
use std::path::{Path, PathBuf};

/// What currently occupies a skill location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationState {
    /// Nothing at the path, not even a dangling link.
    Absent,
    /// Symlink resolving to the skill's canonical repository path.
    OwnedSymlink,
    /// Symlink resolving somewhere else.
    ForeignSymlink { target: PathBuf },
    /// Symlink whose target no longer exists.
    BrokenSymlink,
    /// Real directory or file that this tool did not create.
    ForeignDirectory,
}

impl LocationState {
    /// Whether anything (including a dangling link) occupies the path.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Whether the path may be written without explicit confirmation.
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Absent | Self::OwnedSymlink)
    }

    /// Whether the path is a symlink of any kind.
    pub fn is_symlink(&self) -> bool {
        matches!(
            self,
            Self::OwnedSymlink | Self::ForeignSymlink { .. } | Self::BrokenSymlink
        )
    }

    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::OwnedSymlink => "owned_symlink",
            Self::ForeignSymlink { .. } => "foreign_symlink",
            Self::BrokenSymlink => "broken_symlink",
            Self::ForeignDirectory => "foreign_directory",
        }
    }
}

impl fmt::Display for LocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignSymlink { target } => write!(f, "symlink -> {}", target.display()),
            Self::OwnedSymlink => f.write_str("synced"),
            Self::BrokenSymlink => f.write_str("broken symlink"),
            Self::ForeignDirectory => f.write_str("local directory (not synced)"),
            Self::Absent => f.write_str("not installed"),
        }
    }
}

/// Classify `path`.
///
/// `expected` is the skill's canonical repository path, already passed
/// through [`resolve`]; without it every resolvable symlink is reported as
/// foreign. `path` is resolved once per call, so the result is a snapshot
/// that may already be stale when read.
pub fn probe(path: &Path, expected: Option<&Path>) -> LocationState {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LocationState::Absent,
        Err(e) => {
            // Unreadable entries are treated as occupied so nothing overwrites them silently.
            tracing::warn!(path = %path.display(), error = %e, "cannot stat location");
            return LocationState::ForeignDirectory;
        }
    };

    if !meta.file_type().is_symlink() {
        return LocationState::ForeignDirectory;
    }

    let target = match std::fs::canonicalize(path) {
        Ok(t) => t,
        Err(_) => return LocationState::BrokenSymlink,
    };

    match expected {
        Some(exp) if target == exp => LocationState::OwnedSymlink,
        _ => LocationState::ForeignSymlink { target },
    }
}

/// Resolve a canonical path for comparison in [`probe`]. A path that does
/// not exist yet is returned unchanged.
pub fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
