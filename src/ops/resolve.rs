//! Resolve logical package names into a build configuration.
//!
//! Each package runs through a small state machine:
//!
//! ```text
//! ProbePkgConfig ──found──────────────────────────────────────▶ Done
//!       │ fallback
//!       ▼
//! SearchFilesystem ──found────────────────────────────────────▶ Done
//!       │ not found, buildable recipe          │ no recipe / unsupported
//!       ▼                                      ▼
//! AcquireAndBuild ──error──▶ Failed          Failed
//!       │
//!       ▼
//! SearchFilesystemRetry ──found──▶ Done, otherwise Failed
//! ```
//!
//! The retry runs exactly once, with the same acceptance rule as the first
//! search. A forced build of a package with a buildable recipe starts at
//! `AcquireAndBuild`, since an earlier build would otherwise satisfy the
//! first search.

use std::path::PathBuf;

use crate::builder::AutotoolsBuilder;
use crate::core::{
    BuildConfiguration, OsKind, PackageCatalog, PackageLayout, PackageRecipe, PlatformProfile,
    ResolveError, ResolvedArtifact,
};
use crate::search::{expand, is_library, linker_reference, search};
use crate::sources::archive::extract_tarball_file;
use crate::sources::download::{archive_path, discard_archive};
use crate::sources::{Downloader, FetchOutcome, PkgConfigProbe, ProbeOutcome, SourceFetcher};
use crate::util::process::CommandRunner;

/// Options for resolving a set of packages.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Logical package names, resolved in order
    pub packages: Vec<String>,

    /// Source language hint, passed through to the output
    pub language: Option<String>,

    /// Ask pkg-config first
    pub use_pkg_config: bool,

    /// Rebuild even when a built artifact exists
    pub force_build: bool,

    /// Why downloads are forbidden (None = allowed)
    pub downloads_disabled: Option<String>,

    /// Windows toolset for `{name}-{toolset}-{arch}` names
    pub toolset: Option<String>,

    /// Directories searched before the platform defaults
    pub extra_dirs: Vec<PathBuf>,

    /// Parallel `make` jobs (None = auto-detect)
    pub jobs: Option<usize>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            packages: Vec::new(),
            language: None,
            use_pkg_config: true,
            force_build: false,
            downloads_disabled: None,
            toolset: None,
            extra_dirs: Vec::new(),
            jobs: None,
        }
    }
}

impl ResolveOptions {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResolveOptions {
            packages: packages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Pipeline position for one package.
#[derive(Debug)]
enum Stage {
    ProbePkgConfig,
    SearchFilesystem,
    AcquireAndBuild,
    SearchFilesystemRetry,
    Done(Box<BuildConfiguration>),
    Failed(ResolveError),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::ProbePkgConfig => "probe-pkg-config",
            Stage::SearchFilesystem => "search-filesystem",
            Stage::AcquireAndBuild => "acquire-and-build",
            Stage::SearchFilesystemRetry => "search-filesystem-retry",
            Stage::Done(_) => "done",
            Stage::Failed(_) => "failed",
        }
    }
}

/// Drives the per-package pipeline.
pub struct Resolver<'a> {
    profile: &'a PlatformProfile,
    layout: &'a PackageLayout,
    catalog: &'a PackageCatalog,
    runner: &'a dyn CommandRunner,
    downloader: &'a dyn Downloader,
    pkg_config_program: String,
}

impl<'a> Resolver<'a> {
    pub fn new(
        profile: &'a PlatformProfile,
        layout: &'a PackageLayout,
        catalog: &'a PackageCatalog,
        runner: &'a dyn CommandRunner,
        downloader: &'a dyn Downloader,
    ) -> Self {
        Resolver {
            profile,
            layout,
            catalog,
            runner,
            downloader,
            pkg_config_program: "pkg-config".to_string(),
        }
    }

    pub fn with_pkg_config_program(mut self, program: impl Into<String>) -> Self {
        self.pkg_config_program = program.into();
        self
    }

    fn os(&self) -> OsKind {
        self.profile.os_kind()
    }

    /// Resolve every requested package and merge the results.
    ///
    /// Packages are processed sequentially; the first failure aborts.
    pub fn resolve(&self, options: &ResolveOptions) -> Result<BuildConfiguration, ResolveError> {
        let mut config = BuildConfiguration::new();
        config.language = options.language.clone();

        for package in &options.packages {
            let resolved = self.resolve_package(package, options)?;
            config.merge(resolved);
        }

        Ok(config)
    }

    /// Run the pipeline for a single package.
    pub fn resolve_package(
        &self,
        package: &str,
        options: &ResolveOptions,
    ) -> Result<BuildConfiguration, ResolveError> {
        let directories = self.search_directories(options);
        let patterns = self.name_patterns(package, options.toolset.as_deref());

        let mut stage = if options.force_build && self.buildable_recipe(package, &[]).is_ok() {
            Stage::AcquireAndBuild
        } else if options.use_pkg_config {
            Stage::ProbePkgConfig
        } else {
            Stage::SearchFilesystem
        };

        loop {
            tracing::debug!("{}: {}", package, stage.name());

            stage = match stage {
                Stage::ProbePkgConfig => {
                    let probe = PkgConfigProbe::new(self.runner)
                        .with_program(self.pkg_config_program.clone());
                    match probe.probe(&[package.to_string()]) {
                        ProbeOutcome::Found(config) => {
                            tracing::info!("{}: found via {}", package, self.pkg_config_program);
                            Stage::Done(Box::new(config))
                        }
                        ProbeOutcome::Fallback(reason) => {
                            tracing::debug!("{}: pkg-config fallback: {}", package, reason);
                            Stage::SearchFilesystem
                        }
                    }
                }
                Stage::SearchFilesystem => match self.find(&directories, &patterns) {
                    Some(artifact) => {
                        Stage::Done(Box::new(self.configuration_for(package, &artifact)))
                    }
                    None => match self.buildable_recipe(package, &directories) {
                        Ok(_) => Stage::AcquireAndBuild,
                        Err(e) => Stage::Failed(e),
                    },
                },
                Stage::AcquireAndBuild => match self.acquire_and_build(package, options) {
                    Ok(stable_dir) => {
                        tracing::debug!("{}: built into {}", package, stable_dir.display());
                        Stage::SearchFilesystemRetry
                    }
                    Err(e) => Stage::Failed(e),
                },
                Stage::SearchFilesystemRetry => {
                    // the stable directory may not have existed for the first search
                    let directories = self.search_directories(options);
                    match self.find(&directories, &patterns) {
                        Some(artifact) => {
                            Stage::Done(Box::new(self.configuration_for(package, &artifact)))
                        }
                        None => Stage::Failed(ResolveError::NotFound {
                            package: package.to_string(),
                            searched: directories,
                        }),
                    }
                }
                Stage::Done(config) => return Ok(*config),
                Stage::Failed(e) => return Err(e),
            };
        }
    }

    /// Download (if needed) and unpack a package's sources; returns the
    /// source tree.
    pub fn acquire(
        &self,
        package: &str,
        options: &ResolveOptions,
    ) -> Result<PathBuf, ResolveError> {
        let recipe = self.buildable_recipe(package, &[])?;
        self.acquire_recipe(recipe, options)
    }

    /// Acquire and build a package's sources; returns the stable library
    /// directory.
    pub fn acquire_and_build(
        &self,
        package: &str,
        options: &ResolveOptions,
    ) -> Result<PathBuf, ResolveError> {
        let recipe = self.buildable_recipe(package, &[])?;
        let source_dir = self.acquire_recipe(recipe, options)?;

        let mut builder = AutotoolsBuilder::new(self.runner, recipe, self.layout, self.os());
        if let Some(jobs) = options.jobs {
            builder = builder.jobs(jobs);
        }
        builder.build(&source_dir, options.force_build)
    }

    fn acquire_recipe(
        &self,
        recipe: &PackageRecipe,
        options: &ResolveOptions,
    ) -> Result<PathBuf, ResolveError> {
        let external = self.layout.external_dir();
        let archive = archive_path(&recipe.url, &external)?;

        if let Some(reason) = &options.downloads_disabled {
            if !archive.exists() {
                return Err(ResolveError::DownloadsDisabled {
                    package: recipe.name.clone(),
                    reason: reason.clone(),
                });
            }
        }

        let outcome = SourceFetcher::new(self.downloader).fetch(
            &recipe.url,
            &external,
            true,
            recipe.sha256.as_deref(),
        )?;

        let source_dir = self.layout.source_dir(&recipe.source_dir);
        if matches!(outcome, FetchOutcome::Skipped { .. }) && !source_dir.is_dir() {
            tracing::info!("Extracting {} to {}", archive.display(), external.display());
            if let Err(e) = extract_tarball_file(&archive, &external) {
                discard_archive(&archive);
                return Err(ResolveError::Extraction {
                    archive,
                    message: format!("{:#}", e),
                });
            }
        }

        if !source_dir.is_dir() {
            return Err(ResolveError::Extraction {
                archive,
                message: format!("archive did not contain `{}`", recipe.source_dir),
            });
        }
        Ok(source_dir)
    }

    /// Recipe for `package`, if it can be built here.
    fn buildable_recipe(
        &self,
        package: &str,
        searched: &[PathBuf],
    ) -> Result<&'a PackageRecipe, ResolveError> {
        let Some(recipe) = self.catalog.get(package) else {
            return Err(ResolveError::NotFound {
                package: package.to_string(),
                searched: searched.to_vec(),
            });
        };

        if !recipe.supports_build_on(self.os()) {
            return Err(ResolveError::UnsupportedPlatform {
                package: package.to_string(),
                os: self.os(),
            });
        }
        Ok(recipe)
    }

    /// Stable directory (if present), configured extras, then profile
    /// defaults; duplicates keep their first position.
    fn search_directories(&self, options: &ResolveOptions) -> Vec<PathBuf> {
        let stable = self.layout.stable_library_dir(self.os());
        let mut dirs = Vec::new();

        let ordered = std::iter::once(stable)
            .filter(|d| d.is_dir())
            .chain(options.extra_dirs.iter().cloned())
            .chain(self.profile.search_directories().iter().cloned());

        for dir in ordered {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// The unversioned name a source build links under, then the bare name,
    /// then `{name}-{arch}`, then `{name}-{toolset}-{arch}` on Windows when a
    /// toolset is known.
    ///
    /// The built link comes first because the wildcard patterns sort the
    /// versioned file (`libfoo-1.0.0.dylib`) ahead of it.
    fn name_patterns(&self, package: &str, toolset: Option<&str>) -> Vec<String> {
        let exts = self.profile.library_extensions();
        let arch = self.profile.arch().as_str();

        let mut patterns: Vec<String> = self
            .catalog
            .get(package)
            .and_then(|recipe| recipe.artifact_names(self.os()))
            .and_then(|names| names.links.last().cloned())
            .into_iter()
            .collect();
        patterns.extend(expand(package, exts, false));
        patterns.extend(expand(&format!("{}-{}", package, arch), exts, true));
        if self.os().is_windows() {
            if let Some(toolset) = toolset {
                patterns.extend(expand(
                    &format!("{}-{}-{}", package, toolset, arch),
                    exts,
                    true,
                ));
            }
        }
        patterns
    }

    fn find(&self, directories: &[PathBuf], patterns: &[String]) -> Option<ResolvedArtifact> {
        let exts = self.profile.library_extensions();
        search(directories, patterns, |path| is_library(path, exts))
    }

    fn configuration_for(&self, package: &str, artifact: &ResolvedArtifact) -> BuildConfiguration {
        let reference = linker_reference(artifact, self.os());
        tracing::info!(
            "{}: found {} (links as `{}`)",
            package,
            artifact.file_path.display(),
            reference.symbolic_name
        );

        let mut config = BuildConfiguration::new();
        config.add_linker_reference(&reference, self.profile.has_runtime_library_dirs());
        config
            .include_directories
            .extend(self.profile.include_directories().iter().cloned());

        if let Some(include) = self.recipe_include_dir(package) {
            config.include_directories.insert(include);
        }
        config
    }

    /// Header directory inside previously extracted sources.
    fn recipe_include_dir(&self, package: &str) -> Option<PathBuf> {
        let recipe = self.catalog.get(package)?;
        let subdir = recipe.include_subdir.as_deref()?;
        let dir = self.layout.source_dir(&recipe.source_dir).join(subdir);
        dir.is_dir().then_some(dir)
    }
}
