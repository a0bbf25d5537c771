//! Windows toolset selection.
//!
//! Prebuilt MSVC import libraries are named `{name}-{toolset}-{arch}.lib`.
//! The toolset is never inferred from the running process: it is either given
//! outright or derived from a language-runtime version the caller supplies.

use anyhow::{bail, Context};
use semver::Version;

use crate::core::ResolveError;

/// Runtime versions below each bound map to the paired toolset.
const RUNTIME_TOOLSETS: &[((u64, u64), &str)] = &[((3, 3), "msvc9"), ((3, 5), "msvc10")];

/// Toolset for runtimes at or above the last bound.
const LATEST_TOOLSET: &str = "msvc14";

/// Pick the toolset identifier.
///
/// An explicit toolset always wins. Otherwise a runtime version, if given, is
/// looked up in the decision table. With neither, no toolset-qualified names
/// are searched.
pub fn select_toolset(
    explicit: Option<&str>,
    runtime_version: Option<&str>,
) -> Result<Option<String>, ResolveError> {
    if let Some(toolset) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some(toolset.to_string()));
    }

    let Some(raw) = runtime_version else {
        return Ok(None);
    };

    let version = parse_runtime_version(raw)
        .with_context(|| format!("invalid runtime version `{}`", raw))?;
    let toolset = toolset_for_runtime(&version);
    tracing::debug!("runtime {} selects toolset {}", version, toolset);
    Ok(Some(toolset.to_string()))
}

/// Decision table lookup.
pub fn toolset_for_runtime(version: &Version) -> &'static str {
    RUNTIME_TOOLSETS
        .iter()
        .find(|((major, minor), _)| *version < Version::new(*major, *minor, 0))
        .map(|(_, toolset)| *toolset)
        .unwrap_or(LATEST_TOOLSET)
}

/// Parse `3`, `3.8`, `3.8.1` or `v3.8.1`; missing components are zero.
fn parse_runtime_version(raw: &str) -> anyhow::Result<Version> {
    let trimmed = raw.trim().trim_start_matches('v');
    if let Ok(version) = Version::parse(trimmed) {
        return Ok(version);
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        bail!("expected MAJOR[.MINOR[.PATCH]]");
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("`{}` is not a number", part))?;
    }
    Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}
