//! Filesystem mutations used by the reconciler.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, SyncError};

/// Whether `path` exists or is a (possibly dangling) symlink.
pub fn exists_or_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Remove whatever occupies `path`.
///
/// Symlinks and plain files are unlinked, real directories are removed
/// recursively. Returns `false` when nothing was there.
pub fn remove_path(path: &Path) -> Result<bool> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(SyncError::io(path, e)),
    };

    let file_type = meta.file_type();
    let result = if file_type.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        remove_link_or_file(path, file_type.is_symlink())
    };
    result.map_err(|e| SyncError::io(path, e))?;
    Ok(true)
}

#[cfg(unix)]
fn remove_link_or_file(path: &Path, _is_symlink: bool) -> std::io::Result<()> {
    std::fs::remove_file(path)
}

#[cfg(windows)]
fn remove_link_or_file(path: &Path, is_symlink: bool) -> std::io::Result<()> {
    // Directory symlinks on Windows are removed with `remove_dir`.
    match std::fs::remove_file(path) {
        Err(_) if is_symlink => std::fs::remove_dir(path),
        other => other,
    }
}

/// Create a symlink at `link` pointing to the directory `target`, creating
/// `link`'s parent directories first.
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    if let Some(parent) = link.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    symlink_dir(target, link).map_err(|e| SyncError::io(link, e))
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Copy the directory tree at `src` into `dest`, which must not exist yet.
///
/// Symlinks inside the tree are followed and their content copied.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<u64> {
    let mut files = 0u64;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            SyncError::io(path, io)
        })?;

        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let out = dest.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&out).map_err(|e| SyncError::io(&out, e))?;
        } else {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
            }
            std::fs::copy(entry.path(), &out).map_err(|e| SyncError::io(entry.path(), e))?;
            files += 1;
        }
    }

    tracing::debug!(src = %src.display(), dest = %dest.display(), files, "tree copied");
    Ok(files)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn remove_handles_every_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("dir");
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested/a.txt"), "a").unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, "f").unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&dir, &link).unwrap();

        assert!(remove_path(&link).unwrap());
        assert!(dir.exists(), "unlinking must not touch the target");
        assert!(remove_path(&dir).unwrap());
        assert!(remove_path(&file).unwrap());
        assert!(!remove_path(&tmp.path().join("missing")).unwrap());
    }

    #[test]
    fn dangling_link_counts_as_present() {
        let tmp = tempfile::tempdir().unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(tmp.path().join("gone"), &link).unwrap();
        assert!(exists_or_symlink(&link));
        assert!(!link.exists());
    }

    #[test]
    fn symlink_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("target");
        std::fs::create_dir(&target).unwrap();
        let link = tmp.path().join("a/b/link");

        create_symlink(&target, &link).unwrap();
        assert_eq!(std::fs::read_link(&link).unwrap(), target);
    }

    #[test]
    fn copy_tree_copies_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        std::fs::create_dir_all(src.join("scripts")).unwrap();
        std::fs::write(src.join("SKILL.md"), "# skill").unwrap();
        std::fs::write(src.join("scripts/run.sh"), "echo hi").unwrap();

        let dest = tmp.path().join("dest");
        let files = copy_tree(&src, &dest).unwrap();

        assert_eq!(files, 2);
        assert_eq!(std::fs::read_to_string(dest.join("SKILL.md")).unwrap(), "# skill");
        assert!(dest.join("scripts/run.sh").is_file());
    }
}
