//! Host platform profile.
//!
//! A [`PlatformProfile`] captures everything the resolution pipeline needs to
//! know about the host: which OS conventions apply, the architecture tag used
//! in prebuilt artifact names, which file extensions count as linkable
//! libraries, and where libraries and headers conventionally live.
//!
//! The profile is computed once from a [`HostEnv`] snapshot and then passed
//! explicitly to every component. Tests build their own `HostEnv` instead of
//! touching process-wide state.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsKind {
    Windows,
    #[serde(alias = "darwin", alias = "osx")]
    MacOs,
    Linux,
    Other,
}

impl OsKind {
    /// Map a `std::env::consts::OS` style name onto an OS family.
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "windows" => OsKind::Windows,
            "macos" | "darwin" => OsKind::MacOs,
            "linux" => OsKind::Linux,
            _ => OsKind::Other,
        }
    }

    pub fn is_windows(self) -> bool {
        self == OsKind::Windows
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OsKind::Windows => "windows",
            OsKind::MacOs => "macos",
            OsKind::Linux => "linux",
            OsKind::Other => "other",
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer-width tag used in prebuilt artifact names (`hunspell-x64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchTag {
    X86,
    X64,
}

impl ArchTag {
    pub fn from_pointer_width(bits: u32) -> Self {
        if bits >= 64 {
            ArchTag::X64
        } else {
            ArchTag::X86
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArchTag::X86 => "x86",
            ArchTag::X64 => "x64",
        }
    }
}

impl fmt::Display for ArchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the host state a profile is derived from.
#[derive(Debug, Clone)]
pub struct HostEnv {
    /// OS name in `std::env::consts::OS` form
    pub os: String,
    /// Pointer width in bits
    pub pointer_width: u32,
    /// Current working directory
    pub cwd: PathBuf,
    /// Root of the package that consumes the resolved configuration
    pub package_root: PathBuf,
    /// `%SystemRoot%` (Windows only)
    pub system_root: Option<PathBuf>,
    /// Raw `PATH` value (Windows only)
    pub path: Option<OsString>,
}

impl HostEnv {
    /// Capture the current process environment.
    pub fn current() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        HostEnv {
            os: std::env::consts::OS.to_string(),
            pointer_width: usize::BITS,
            package_root: cwd.clone(),
            cwd,
            system_root: std::env::var_os("SystemRoot").map(PathBuf::from),
            path: std::env::var_os("PATH"),
        }
    }

    /// Use a different package root than the current directory.
    pub fn with_package_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.package_root = root.into();
        self
    }
}

/// Platform conventions for locating native libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    os_kind: OsKind,
    arch: ArchTag,
    library_extensions: Vec<String>,
    search_directories: Vec<PathBuf>,
    include_directories: Vec<PathBuf>,
}

const UNIX_LIBRARY_DIRS: &[&str] = &[
    "/usr/local/lib64",
    "/usr/local/lib",
    "/usr/local/libdata",
    "/opt/local/lib",
    "/usr/lib/x86_64-linux-gnu",
    "/usr/lib64",
    "/usr/lib",
    "/usr/X11/lib",
    "/usr/share",
];

const UNIX_INCLUDE_DIRS: &[&str] = &["/usr/local/include", "/opt/include", "/usr/include"];

impl PlatformProfile {
    /// Detect the profile of the running process.
    pub fn detect() -> Self {
        Self::from_host(&HostEnv::current())
    }

    /// Derive a profile from a host snapshot. Never fails.
    pub fn from_host(host: &HostEnv) -> Self {
        let os_kind = OsKind::from_os_name(&host.os);
        if os_kind == OsKind::Other {
            tracing::warn!(
                "unrecognized platform `{}`, falling back to generic Unix conventions",
                host.os
            );
        }

        let arch = ArchTag::from_pointer_width(host.pointer_width);
        let search_directories = unique_existing_dirs(default_library_dirs(os_kind, host));
        let include_directories = unique_existing_dirs(default_include_dirs(os_kind, host));

        PlatformProfile {
            os_kind,
            arch,
            library_extensions: library_extensions(os_kind),
            search_directories,
            include_directories,
        }
    }

    /// Build a profile with an explicit directory list instead of the
    /// conventional one. Nonexistent directories are still dropped.
    pub fn custom(os_kind: OsKind, arch: ArchTag, search_directories: Vec<PathBuf>) -> Self {
        PlatformProfile {
            os_kind,
            arch,
            library_extensions: library_extensions(os_kind),
            search_directories: unique_existing_dirs(search_directories),
            include_directories: Vec::new(),
        }
    }

    pub fn os_kind(&self) -> OsKind {
        self.os_kind
    }

    pub fn arch(&self) -> ArchTag {
        self.arch
    }

    /// File extensions accepted as build-time link inputs, in priority order.
    pub fn library_extensions(&self) -> &[String] {
        &self.library_extensions
    }

    /// Conventional library directories, highest priority first.
    pub fn search_directories(&self) -> &[PathBuf] {
        &self.search_directories
    }

    /// Conventional header directories.
    pub fn include_directories(&self) -> &[PathBuf] {
        &self.include_directories
    }

    /// Whether source builds can emit rpath-style runtime directories.
    pub fn has_runtime_library_dirs(&self) -> bool {
        !self.os_kind.is_windows()
    }
}

/// Extension table. `.dll` is runtime-only on Windows and never matched.
fn library_extensions(os: OsKind) -> Vec<String> {
    let exts: &[&str] = match os {
        OsKind::Windows => &[".lib"],
        OsKind::MacOs => &["", ".so", ".dylib"],
        OsKind::Linux | OsKind::Other => &["", ".so"],
    };
    exts.iter().map(|s| s.to_string()).collect()
}

fn default_library_dirs(os: OsKind, host: &HostEnv) -> Vec<PathBuf> {
    match os {
        OsKind::Windows => {
            let mut dirs = vec![host.package_root.clone(), host.cwd.clone()];
            if let Some(root) = &host.system_root {
                dirs.push(root.join("system"));
                dirs.push(root.join("system32"));
                dirs.push(root.clone());
            }
            if let Some(path) = &host.path {
                dirs.extend(std::env::split_paths(path).filter(|p| !p.as_os_str().is_empty()));
            }
            dirs.into_iter()
                .map(|p| absolutize(&host.cwd, &p))
                .collect()
        }
        OsKind::MacOs => {
            let mut dirs = vec![host.cwd.clone()];
            dirs.extend(UNIX_LIBRARY_DIRS.iter().map(PathBuf::from));
            dirs.push(PathBuf::from("/opt/homebrew/lib"));
            dirs
        }
        OsKind::Linux | OsKind::Other => {
            let mut dirs = vec![host.cwd.clone()];
            dirs.extend(UNIX_LIBRARY_DIRS.iter().map(PathBuf::from));
            dirs
        }
    }
}

fn default_include_dirs(os: OsKind, host: &HostEnv) -> Vec<PathBuf> {
    let mut dirs = vec![host.cwd.clone()];
    if !os.is_windows() {
        dirs.extend(UNIX_INCLUDE_DIRS.iter().map(PathBuf::from));
    }
    dirs
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Drop duplicates (keeping the first occurrence) and nonexistent directories.
fn unique_existing_dirs(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(dirs.len());
    for dir in dirs {
        if !dir.is_dir() || out.contains(&dir) {
            continue;
        }
        out.push(dir);
    }
    out
}
