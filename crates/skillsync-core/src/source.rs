//! Install sources and skill name resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::discovery::is_hidden;
use crate::error::{Result, SyncError};

/// URL prefixes that mark a git source.
const GIT_PREFIXES: &[&str] = &["https://", "http://", "ssh://", "git://", "git@", "file://"];

/// Extensions accepted as single-file skill archives.
const ARCHIVE_EXTENSIONS: &[&str] = &["skill", "zip"];

/// Where an install takes its content from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillSource {
    /// A local directory, copied as a whole tree.
    Directory { path: PathBuf, name: String },
    /// A zip archive (`.skill` or `.zip`) extracted into the repository.
    Archive { path: PathBuf, name: String },
    /// A git remote, cloned into the repository.
    Git { url: String, name: String },
}

impl SkillSource {
    /// Classify an install argument.
    ///
    /// Anything starting with a git prefix is a remote. Otherwise the argument
    /// is a path, resolved against `work_dir`, which must exist.
    pub fn parse(arg: &str, work_dir: &Path) -> Result<Self> {
        let trimmed = arg.trim();
        if GIT_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            let name = name_from_url(trimmed).ok_or_else(|| SyncError::InvalidSource {
                source_arg: arg.to_owned(),
                reason: "cannot derive a skill name from the URL".into(),
            })?;
            validate_name(&name)?;
            return Ok(Self::Git {
                url: trimmed.to_owned(),
                name,
            });
        }

        let joined = work_dir.join(trimmed);
        let path = std::fs::canonicalize(&joined).map_err(|_| {
            SyncError::NotFound(format!("path does not exist: {}", joined.display()))
        })?;

        if path.is_dir() {
            let name = file_name(&path).ok_or_else(|| SyncError::InvalidSource {
                source_arg: arg.to_owned(),
                reason: "directory has no name".into(),
            })?;
            validate_name(&name)?;
            return Ok(Self::Directory { path, name });
        }

        let is_archive = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ARCHIVE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if path.is_file() && is_archive {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or_else(|| SyncError::InvalidSource {
                    source_arg: arg.to_owned(),
                    reason: "archive has no name".into(),
                })?;
            validate_name(&name)?;
            return Ok(Self::Archive { path, name });
        }

        Err(SyncError::InvalidSource {
            source_arg: arg.to_owned(),
            reason: "expected a directory, a .skill/.zip archive, or a git URL".into(),
        })
    }

    /// The skill name this source installs as.
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::Archive { name, .. } | Self::Git { name, .. } => {
                name
            }
        }
    }

    /// Local path of the source, if it has one.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Directory { path, .. } | Self::Archive { path, .. } => Some(path),
            Self::Git { .. } => None,
        }
    }
}

impl fmt::Display for SkillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory { path, .. } => write!(f, "directory {}", path.display()),
            Self::Archive { path, .. } => write!(f, "archive {}", path.display()),
            Self::Git { url, .. } => write!(f, "git {url}"),
        }
    }
}

/// Reject names that cannot be a single, visible directory entry.
pub fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == ".."
        || is_hidden(name)
        || name.contains('/')
        || name.contains('\\');
    if bad {
        return Err(SyncError::InvalidName(name.to_owned()));
    }
    Ok(())
}

/// Last path segment of a URL with any `.git` suffix removed.
fn name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_owned())
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
