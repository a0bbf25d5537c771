//! Global context for libscout operations.
//!
//! Provides centralized access to configuration, paths, and the environment
//! signals libscout honours. Process-wide state is read here once and handed
//! to the pipeline as plain values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{HostEnv, PackageLayout};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Set to any non-empty value other than `0` to forbid source downloads.
pub const NO_DOWNLOAD_ENV: &str = "LIBSCOUT_NO_DOWNLOAD";

/// Overrides the Windows compiler toolset identifier.
pub const TOOLSET_ENV: &str = "LIBSCOUT_TOOLSET";

/// Overrides the pkg-config executable.
pub const PKG_CONFIG_ENV: &str = "PKG_CONFIG";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Root of the package being built against the native libraries
    root: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            root: cwd.clone(),
            cwd,
        })
    }

    /// Use a different package root. Relative roots resolve against cwd.
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            self.cwd.join(root)
        };
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the package root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        project_config_path(&self.root)
    }

    /// Load global and project configuration, project winning.
    pub fn load_config(&self) -> Config {
        let global = global_config_path().unwrap_or_default();
        load_config(&global, &self.project_config_path())
    }

    /// Package-local directories used by fetches and builds.
    pub fn layout(&self) -> PackageLayout {
        PackageLayout::new(&self.root)
    }

    /// Host snapshot for profile detection.
    pub fn host_env(&self) -> HostEnv {
        HostEnv::current().with_package_root(&self.root)
    }

    /// Why downloads are forbidden by the environment, if they are.
    pub fn downloads_disabled_by_env(&self) -> Option<String> {
        download_opt_out(std::env::var(NO_DOWNLOAD_ENV).ok().as_deref())
    }

    /// Toolset identifier from the environment.
    pub fn toolset_from_env(&self) -> Option<String> {
        std::env::var(TOOLSET_ENV).ok().filter(|s| !s.is_empty())
    }

    /// pkg-config executable to probe.
    pub fn pkg_config_program(&self) -> String {
        std::env::var(PKG_CONFIG_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "pkg-config".to_string())
    }
}

fn download_opt_out(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() && v != "0" => Some(format!("{} is set", NO_DOWNLOAD_ENV)),
        _ => None,
    }
}
