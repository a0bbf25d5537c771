//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Copy a file, replacing any existing file at the destination.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if dst.symlink_metadata().is_ok() {
        fs::remove_file(dst)
            .with_context(|| format!("failed to replace {}", dst.display()))?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Point `link` at `target` (a file name in the same directory).
///
/// An existing entry at `link` is replaced. Where symlinks cannot be created
/// the target is copied instead.
pub fn link_or_copy(target_name: &Path, link: &Path) -> Result<()> {
    if link.symlink_metadata().is_ok() {
        fs::remove_file(link)
            .with_context(|| format!("failed to replace {}", link.display()))?;
    }

    if let Err(e) = symlink(target_name, link) {
        tracing::debug!(
            "symlink {} -> {} failed ({}), copying instead",
            link.display(),
            target_name.display(),
            e
        );
        let dir = link.parent().unwrap_or_else(|| Path::new("."));
        copy_file(&dir.join(target_name), link)?;
    }
    Ok(())
}

/// Create a symlink (platform-aware).
#[cfg(unix)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}
