//! Wiring for a real invocation: host profile, configuration, environment,
//! and the system command runner and HTTP client.

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::core::{
    BuildConfiguration, PackageCatalog, PackageLayout, PlatformProfile, ResolveError,
};
use crate::ops::resolve::{ResolveOptions, Resolver};
use crate::ops::toolset::select_toolset;
use crate::sources::HttpDownloader;
use crate::util::process::SystemRunner;
use crate::util::{Config, GlobalContext};

/// Collaborators shared by every command of one run.
pub struct Session {
    pub profile: PlatformProfile,
    pub layout: PackageLayout,
    pub catalog: PackageCatalog,
    runner: SystemRunner,
    downloader: HttpDownloader,
    pkg_config_program: String,
}

impl Session {
    pub fn new(gctx: &GlobalContext, config: &Config) -> Self {
        let mut catalog = PackageCatalog::builtin();
        catalog.extend_from_config(&config.packages);

        Session {
            profile: PlatformProfile::from_host(&gctx.host_env()),
            layout: gctx.layout(),
            catalog,
            runner: SystemRunner,
            downloader: HttpDownloader::new().with_progress(std::io::stderr().is_terminal()),
            pkg_config_program: gctx.pkg_config_program(),
        }
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(
            &self.profile,
            &self.layout,
            &self.catalog,
            &self.runner,
            &self.downloader,
        )
        .with_pkg_config_program(self.pkg_config_program.clone())
    }
}

/// Options from configuration and environment, before command-line overrides.
///
/// `LIBSCOUT_NO_DOWNLOAD` beats `[net] offline`; `LIBSCOUT_TOOLSET` beats
/// `[windows] toolset`. Relative `[search] extra_dirs` are taken relative to
/// the package root, not the directory the tool happens to run in.
pub fn resolve_options(
    gctx: &GlobalContext,
    config: &Config,
    packages: Vec<String>,
) -> Result<ResolveOptions, ResolveError> {
    let downloads_disabled = gctx.downloads_disabled_by_env().or_else(|| {
        config
            .net
            .offline
            .then(|| "offline mode is enabled in configuration".to_string())
    });

    let explicit_toolset = gctx
        .toolset_from_env()
        .or_else(|| config.windows.toolset.clone());
    let toolset = select_toolset(
        explicit_toolset.as_deref(),
        config.windows.runtime_version.as_deref(),
    )?;

    Ok(ResolveOptions {
        packages,
        language: None,
        use_pkg_config: config.use_pkg_config(),
        force_build: config.build.force,
        downloads_disabled,
        toolset,
        extra_dirs: config
            .search
            .extra_dirs
            .iter()
            .map(|dir| gctx.root().join(dir))
            .collect(),
        jobs: config.build.jobs,
    })
}

/// Resolve `options.packages` against the host.
pub fn resolve_packages(
    gctx: &GlobalContext,
    config: &Config,
    options: &ResolveOptions,
) -> Result<BuildConfiguration, ResolveError> {
    Session::new(gctx, config).resolver().resolve(options)
}

/// Download and unpack one package's sources.
pub fn fetch_package(
    gctx: &GlobalContext,
    config: &Config,
    package: &str,
    options: &ResolveOptions,
) -> Result<PathBuf, ResolveError> {
    Session::new(gctx, config).resolver().acquire(package, options)
}

/// Fetch and build one package from source.
pub fn build_package(
    gctx: &GlobalContext,
    config: &Config,
    package: &str,
    options: &ResolveOptions,
) -> Result<PathBuf, ResolveError> {
    Session::new(gctx, config)
        .resolver()
        .acquire_and_build(package, options)
}

/// One-call entry point for build scripts.
///
/// The package root is `CARGO_MANIFEST_DIR` when set, otherwise the current
/// directory; configuration and environment apply as for the CLI.
pub fn configure<I, S>(packages: I) -> Result<BuildConfiguration, ResolveError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut gctx = GlobalContext::new()?;
    if let Some(dir) = std::env::var_os("CARGO_MANIFEST_DIR") {
        gctx = gctx.with_root(PathBuf::from(dir));
    }

    let config = gctx.load_config();
    let options = resolve_options(
        &gctx,
        &config,
        packages.into_iter().map(Into::into).collect(),
    )?;
    resolve_packages(&gctx, &config, &options)
}
