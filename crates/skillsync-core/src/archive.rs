//! Skill archive extraction (`.skill` / `.zip`).

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// Extract `archive` into `dir` and return the skill's content root.
///
/// Archives either hold the skill files at the top level or wrap them in a
/// single directory; in the latter case that directory is the content root.
/// Entry paths that would escape `dir` are rejected by the zip reader.
pub fn extract(archive: &Path, dir: &Path) -> Result<PathBuf> {
    let file = File::open(archive).map_err(|e| SyncError::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| archive_error(archive, e))?;
    let entries = zip.len();
    std::fs::create_dir_all(dir).map_err(|e| SyncError::io(dir, e))?;
    zip.extract(dir).map_err(|e| archive_error(archive, e))?;

    tracing::debug!(archive = %archive.display(), entries, "archive extracted");
    Ok(content_root(dir))
}

fn content_root(dir: &Path) -> PathBuf {
    let Ok(read) = std::fs::read_dir(dir) else {
        return dir.to_path_buf();
    };
    let visible: Vec<_> = read
        .flatten()
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            !name.starts_with('.') && name != "__MACOSX"
        })
        .collect();

    match visible.as_slice() {
        [only] if only.file_type().is_ok_and(|t| t.is_dir()) => only.path(),
        _ => dir.to_path_buf(),
    }
}

fn archive_error(path: &Path, e: zip::result::ZipError) -> SyncError {
    SyncError::Archive {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
