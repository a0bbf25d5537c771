//! Turn a located library file into the name a linker expects.

use std::path::Path;

use crate::core::{LinkerReference, OsKind, ResolvedArtifact};

/// Longest suffixes first so `.dll.a` is not cut down to `.dll`.
const LIBRARY_SUFFIXES: &[&str] = &[".dll.a", ".dylib", ".so", ".dll", ".lib", ".a"];

/// Normalize a library file path into its linker name.
///
/// One trailing library suffix is stripped. On every platform except Windows
/// a single leading `lib` is stripped too; MSVC links `.lib` stubs by their
/// literal name. Names with no recognized suffix come back otherwise unchanged.
pub fn normalize(file_path: &Path, os: OsKind) -> String {
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = file_name.as_str();
    if let Some(stripped) = LIBRARY_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
    {
        name = stripped;
    }

    if !os.is_windows() {
        if let Some(stripped) = name.strip_prefix("lib").filter(|rest| !rest.is_empty()) {
            name = stripped;
        }
    }

    name.to_string()
}

/// Derive the linker reference for a resolved artifact.
pub fn linker_reference(artifact: &ResolvedArtifact, os: OsKind) -> LinkerReference {
    LinkerReference {
        symbolic_name: normalize(&artifact.file_path, os),
        directory: artifact.containing_directory.clone(),
    }
}
