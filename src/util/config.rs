//! Configuration file support for libscout.
//!
//! libscout reads two configuration files:
//! - Global: `~/.libscout/config.toml` - User-wide defaults
//! - Project: `libscout.toml` in the package root - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::PackageRecipe;

/// Name of the project configuration file.
pub const PROJECT_CONFIG_NAME: &str = "libscout.toml";

/// libscout configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search settings
    pub search: SearchConfig,

    /// Source-build settings
    pub build: BuildConfig,

    /// Network settings
    pub net: NetConfig,

    /// Windows prebuilt-artifact settings
    pub windows: WindowsConfig,

    /// Extra source-build recipes, keyed by package name
    pub packages: BTreeMap<String, PackageRecipe>,
}

/// Search-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Probe pkg-config before searching the filesystem (default: true)
    pub pkg_config: Option<bool>,

    /// Directories searched before the platform defaults
    pub extra_dirs: Vec<PathBuf>,
}

/// Source-build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Parallel `make` jobs (None = auto-detect)
    pub jobs: Option<usize>,

    /// Always rebuild, even if a built artifact exists
    pub force: bool,
}

/// Network-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Offline mode (never download sources)
    pub offline: bool,
}

/// Windows toolset selection for prebuilt `.lib` stubs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowsConfig {
    /// Compiler toolset identifier (e.g. `msvc14`)
    pub toolset: Option<String>,

    /// Language-runtime version used to pick a toolset when none is given
    pub runtime_version: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Search settings
        if other.search.pkg_config.is_some() {
            self.search.pkg_config = other.search.pkg_config;
        }
        if !other.search.extra_dirs.is_empty() {
            self.search.extra_dirs = other.search.extra_dirs;
        }

        // Build settings
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.force {
            self.build.force = true;
        }

        // Net settings
        if other.net.offline {
            self.net.offline = true;
        }

        // Windows settings
        if other.windows.toolset.is_some() {
            self.windows.toolset = other.windows.toolset;
        }
        if other.windows.runtime_version.is_some() {
            self.windows.runtime_version = other.windows.runtime_version;
        }

        // Recipes are merged per package
        self.packages.extend(other.packages);
    }

    /// Whether pkg-config should be probed.
    pub fn use_pkg_config(&self) -> bool {
        self.search.pkg_config.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (libscout.toml)
/// 2. Global config (~/.libscout/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global libscout config directory (~/.libscout).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".libscout"))
}

/// Get the global config path (~/.libscout/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (libscout.toml in the package root).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_NAME)
}
