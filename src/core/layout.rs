//! On-disk locations owned by the consuming package.
//!
//! ```text
//! <root>/
//! ├── libs/
//! │   ├── unix/                 # stable library dir (source builds land here)
//! │   └── msvc/                 # prebuilt Windows import libraries
//! └── external/
//!     ├── v1.6.2.tar.gz         # downloaded archive, kept for idempotence
//!     ├── hunspell-1.6.2/       # extracted sources, kept
//!     └── build-hunspell/       # staging prefix, removed after every build
//! ```

use std::path::{Path, PathBuf};

use crate::core::platform::OsKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    root: PathBuf,
}

impl PackageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PackageLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Package-local directory where linkable libraries persist across runs.
    pub fn stable_library_dir(&self, os: OsKind) -> PathBuf {
        let family = if os.is_windows() { "msvc" } else { "unix" };
        self.root.join("libs").join(family)
    }

    /// Where archives are downloaded and extracted.
    pub fn external_dir(&self) -> PathBuf {
        self.root.join("external")
    }

    /// Unpacked source tree for a recipe's `source_dir`.
    pub fn source_dir(&self, source_dir: &str) -> PathBuf {
        self.external_dir().join(source_dir)
    }

    /// Scratch install prefix for one package's build.
    pub fn staging_prefix(&self, package: &str) -> PathBuf {
        self.external_dir().join(format!("build-{}", package))
    }
}
