//! Priority-ordered filesystem search.
//!
//! Directories are the outer loop and patterns the inner loop, so a match in
//! an earlier (higher priority, e.g. package-local) directory always beats a
//! match in a later (system-wide) one.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::core::ResolvedArtifact;
use crate::search::names::is_glob;

/// One (directory, pattern) pair to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub directory: PathBuf,
    pub name_pattern: String,
    pub is_glob: bool,
}

impl SearchCandidate {
    /// Paths on disk this candidate refers to. Literal candidates always
    /// yield exactly one path, whether or not it exists.
    fn expand(&self) -> Vec<PathBuf> {
        if !self.is_glob {
            return vec![self.directory.join(&self.name_pattern)];
        }

        let dir = Pattern::escape(&self.directory.to_string_lossy());
        let full = Path::new(&dir).join(&self.name_pattern);
        let full = full.to_string_lossy();

        match glob::glob(&full) {
            Ok(paths) => paths
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        tracing::debug!("glob error: {}", e);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                tracing::debug!("invalid glob pattern `{}`: {}", full, e);
                Vec::new()
            }
        }
    }
}

/// Build the ordered candidate list for a search.
pub fn candidates(directories: &[PathBuf], patterns: &[String]) -> Vec<SearchCandidate> {
    directories
        .iter()
        .flat_map(|dir| {
            patterns.iter().map(move |pattern| SearchCandidate {
                directory: dir.clone(),
                name_pattern: pattern.clone(),
                is_glob: is_glob(pattern),
            })
        })
        .collect()
}

/// Return the first path, in directory-then-pattern order, accepted by `accept`.
pub fn search<F>(
    directories: &[PathBuf],
    patterns: &[String],
    accept: F,
) -> Option<ResolvedArtifact>
where
    F: Fn(&Path) -> bool,
{
    for candidate in candidates(directories, patterns) {
        for path in candidate.expand() {
            if accept(&path) {
                tracing::debug!("matched {}", path.display());
                return Some(ResolvedArtifact::new(path));
            }
        }
    }
    None
}

/// [`search`] with the default predicate: the path exists.
pub fn search_existing(directories: &[PathBuf], patterns: &[String]) -> Option<ResolvedArtifact> {
    search(directories, patterns, |path| path.exists())
}

/// Whether `path` is a regular file with one of the accepted extensions.
///
/// Only the last extension is considered, so compound extensions such as
/// `.dll.a` never match even if listed. Known limitation; callers depend on
/// the narrower matching.
pub fn is_library(path: &Path, extensions: &[String]) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    extensions.iter().any(|accepted| *accepted == ext)
}
