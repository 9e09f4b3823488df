//! Storage tree operations
//!
//! Recursive copy, purge, move and delete over repository storage trees.
//! Walks never follow symlinks, so a link cycle cannot make them diverge.
//! Copy recovers per-file failures and reports them in the returned stats;
//! everything else propagates the first error.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{DepotError, DepotResult};

/// Outcome of a recursive copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub failed: usize,
}

/// Recursively copy `src` into `dst`, preserving permissions and
/// modification times where the platform allows.
///
/// Existing destination directories are tolerated; individual file copy
/// failures are logged and counted but do not abort the walk.
pub fn copy_tree(src: &Path, dst: &Path) -> DepotResult<CopyStats> {
    let mut stats = CopyStats::default();
    copy_tree_inner(src, dst, &mut stats)?;
    Ok(stats)
}

fn copy_tree_inner(src: &Path, dst: &Path, stats: &mut CopyStats) -> DepotResult<()> {
    if let Err(e) = fs::create_dir_all(dst) {
        // An already-existing directory is not a collision worth failing on.
        if !dst.is_dir() {
            return Err(e.into());
        }
    }

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dst.join(entry.file_name());

        if file_type.is_symlink() {
            debug!(path = %entry.path().display(), "skipping symlink during copy");
            continue;
        }
        if file_type.is_dir() {
            copy_tree_inner(&entry.path(), &target, stats)?;
            continue;
        }

        match copy_file(&entry.path(), &target) {
            Ok(()) => stats.copied += 1,
            Err(e) => {
                warn!(
                    from = %entry.path().display(),
                    to = %target.display(),
                    error = %e,
                    "file copy failed, continuing"
                );
                stats.failed += 1;
            }
        }
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::copy(src, dst)?;
    // Permissions travel with fs::copy; carry the mtime over as well.
    if let Ok(modified) = fs::metadata(src).and_then(|m| m.modified()) {
        if let Ok(file) = fs::File::options().write(true).open(dst) {
            let _ = file.set_modified(modified);
        }
    }
    Ok(())
}

/// Delete everything under `dir`, leaving the directory itself in place.
pub fn purge_tree(dir: &Path) -> DepotResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Remove a tree entirely; missing trees are a no-op.
pub fn remove_tree(path: &Path) -> DepotResult<()> {
    if !path.exists() {
        return Ok(());
    }
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Move `src` to `dst`: an atomic rename when the filesystem allows it,
/// otherwise a recursive copy followed by deleting the source. Only when
/// both strategies fail is `RelocationFailed` returned.
pub fn move_tree(src: &Path, dst: &Path) -> DepotResult<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(src, dst) {
        Ok(()) => return Ok(()),
        Err(e) => {
            debug!(
                from = %src.display(),
                to = %dst.display(),
                error = %e,
                "rename failed, falling back to copy"
            );
        }
    }

    let stats = copy_tree(src, dst).map_err(|e| DepotError::RelocationFailed {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        message: e.to_string(),
    })?;
    if stats.failed > 0 {
        return Err(DepotError::RelocationFailed {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            message: format!("{} file(s) could not be copied", stats.failed),
        });
    }
    remove_tree(src)?;
    Ok(())
}
