//! Failures surfaced by the resolution pipeline.
//!
//! Expected absences (pkg-config missing, nothing found on a search path) are
//! not errors; they are routed to the next pipeline stage. Everything here is
//! terminal for the invoking build.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::platform::OsKind;

/// Fatal outcome of resolving, fetching or building a package.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("automated source builds of `{package}` are not supported on {os}")]
    UnsupportedPlatform { package: String, os: OsKind },

    #[error("`{command}` failed with exit code {}\n{stderr}", display_code(.code))]
    ExternalTool {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to extract {}: {message}", display_path(.archive))]
    Extraction { archive: PathBuf, message: String },

    #[error("failed to download {url}: {message}")]
    Network { url: String, message: String },

    #[error("checksum mismatch for {url}:\n  expected: {expected}\n  actual:   {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("`{package}` is not installed and downloads are disabled ({reason})")]
    DownloadsDisabled { package: String, reason: String },

    #[error("could not locate library `{package}`{}", display_searched(.searched))]
    NotFound {
        package: String,
        searched: Vec<PathBuf>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResolveError {
    /// A short remediation hint for the CLI.
    pub fn help(&self) -> Option<String> {
        match self {
            ResolveError::UnsupportedPlatform { package, .. } => Some(format!(
                "install `{}` manually and pass its directory with --search-dir",
                package
            )),
            ResolveError::ExternalTool { .. } => {
                Some("make sure autoconf, automake, libtool and make are installed".to_string())
            }
            ResolveError::DownloadsDisabled { .. } => Some(
                "unset LIBSCOUT_NO_DOWNLOAD or drop --offline to allow fetching sources"
                    .to_string(),
            ),
            ResolveError::NotFound { package, .. } => Some(format!(
                "install the `{}` development package or add a [packages.{}] recipe",
                package, package
            )),
            _ => None,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string())
}

fn display_path(path: &std::path::Path) -> String {
    path.display().to_string()
}

fn display_searched(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return String::new();
    }
    let dirs: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
    format!(" (searched: {})", dirs.join(", "))
}
