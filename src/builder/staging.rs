//! Scoped staging prefix for source builds.

use std::path::{Path, PathBuf};

use crate::util::fs::remove_dir_all_if_exists;

/// Install prefix owned by a single build.
///
/// The directory is removed when the guard is dropped, so it never outlives
/// the build, whether the build succeeded, failed, or panicked.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    /// Take ownership of `path` as a staging prefix. The directory itself is
    /// created by `make install`; a leftover from an interrupted run is kept
    /// so its artifact can be reused.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StagingDir { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<prefix>/lib`, where `make install` puts shared objects.
    pub fn lib_dir(&self) -> PathBuf {
        self.path.join("lib")
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if let Err(e) = remove_dir_all_if_exists(&self.path) {
            tracing::warn!("{:#}", e);
        } else {
            tracing::debug!("removed staging prefix {}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removed_on_drop() {
        let tmp = TempDir::new().unwrap();
        let prefix = tmp.path().join("build-demo");

        {
            let staging = StagingDir::new(&prefix);
            std::fs::create_dir_all(staging.lib_dir()).unwrap();
            std::fs::write(staging.lib_dir().join("libdemo.so"), "").unwrap();
        }

        assert!(!prefix.exists());
    }

    #[test]
    fn test_removed_on_error_path() {
        let tmp = TempDir::new().unwrap();
        let prefix = tmp.path().join("build-demo");

        let result: Result<(), &str> = (|| {
            let staging = StagingDir::new(&prefix);
            std::fs::create_dir_all(staging.path()).unwrap();
            Err("make failed")
        })();

        assert!(result.is_err());
        assert!(!prefix.exists());
    }
}
