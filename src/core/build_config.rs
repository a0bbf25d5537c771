//! The normalized compiler/linker configuration handed to the extension build.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A library file located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub file_path: PathBuf,
    pub containing_directory: PathBuf,
}

impl ResolvedArtifact {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let containing_directory = file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        ResolvedArtifact {
            file_path,
            containing_directory,
        }
    }
}

/// A linker-ready library name plus the directory to search for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerReference {
    /// Name as passed to `-l` (or `/DEFAULTLIB` on MSVC)
    pub symbolic_name: String,
    pub directory: PathBuf,
}

/// Compiler and linker settings for building against native libraries.
///
/// Directory and argument collections are sets ordered by value so that the
/// emitted configuration is reproducible; `libraries` keeps link order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub include_directories: BTreeSet<PathBuf>,
    pub library_directories: BTreeSet<PathBuf>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub runtime_library_directories: BTreeSet<PathBuf>,
    pub libraries: Vec<String>,
    pub extra_link_arguments: BTreeSet<String>,
    /// Source language hint, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl BuildConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a library, keeping first-seen order and dropping duplicates.
    pub fn add_library(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.libraries.contains(&name) {
            self.libraries.push(name);
        }
    }

    /// Record a library found on the filesystem together with its directory.
    pub fn add_linker_reference(&mut self, reference: &LinkerReference, runtime_dirs: bool) {
        self.library_directories.insert(reference.directory.clone());
        if runtime_dirs {
            self.runtime_library_directories
                .insert(reference.directory.clone());
        }
        self.add_library(reference.symbolic_name.clone());
    }

    /// Fold another configuration into this one.
    pub fn merge(&mut self, other: BuildConfiguration) {
        self.include_directories.extend(other.include_directories);
        self.library_directories.extend(other.library_directories);
        self.runtime_library_directories
            .extend(other.runtime_library_directories);
        for lib in other.libraries {
            self.add_library(lib);
        }
        self.extra_link_arguments.extend(other.extra_link_arguments);
        if self.language.is_none() {
            self.language = other.language;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include_directories.is_empty()
            && self.library_directories.is_empty()
            && self.libraries.is_empty()
            && self.extra_link_arguments.is_empty()
    }

    /// Render as compiler/linker command-line flags.
    pub fn to_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        for dir in &self.include_directories {
            flags.push(format!("-I{}", dir.display()));
        }
        for dir in &self.library_directories {
            flags.push(format!("-L{}", dir.display()));
        }
        for dir in &self.runtime_library_directories {
            flags.push(format!("-Wl,-rpath,{}", dir.display()));
        }
        for lib in &self.libraries {
            flags.push(format!("-l{}", lib));
        }
        flags.extend(self.extra_link_arguments.iter().cloned());
        flags
    }

    /// Render as `cargo:` build-script directives.
    pub fn to_cargo_directives(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for dir in &self.library_directories {
            lines.push(format!("cargo:rustc-link-search=native={}", dir.display()));
        }
        for lib in &self.libraries {
            lines.push(format!("cargo:rustc-link-lib={}", lib));
        }
        for dir in &self.runtime_library_directories {
            lines.push(format!("cargo:rustc-link-arg=-Wl,-rpath,{}", dir.display()));
        }
        for arg in &self.extra_link_arguments {
            lines.push(format!("cargo:rustc-link-arg={}", arg));
        }
        if !self.include_directories.is_empty() {
            let joined = std::env::join_paths(&self.include_directories)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!("cargo:include={}", joined));
        }
        lines
    }
}
