//! autoconf/make source builds.
//!
//! The build installs into a throwaway staging prefix; only the versioned
//! shared object is kept, copied into the package-local library directory
//! with unversioned links beside it so the filesystem search can find it.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::builder::staging::StagingDir;
use crate::core::{ArtifactNames, OsKind, PackageLayout, PackageRecipe, ResolveError};
use crate::util::fs::{copy_file, ensure_dir, link_or_copy};
use crate::util::process::{CommandRunner, ProcessBuilder};

/// How many trailing stderr lines to keep in a build failure.
const STDERR_TAIL_LINES: usize = 40;

/// Builds one recipe from an unpacked source tree.
pub struct AutotoolsBuilder<'a> {
    runner: &'a dyn CommandRunner,
    recipe: &'a PackageRecipe,
    layout: &'a PackageLayout,
    os: OsKind,
    jobs: usize,
}

impl<'a> AutotoolsBuilder<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        recipe: &'a PackageRecipe,
        layout: &'a PackageLayout,
        os: OsKind,
    ) -> Self {
        AutotoolsBuilder {
            runner,
            recipe,
            layout,
            os,
            jobs: default_jobs(),
        }
    }

    /// Set the number of parallel `make` jobs.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Build `source_dir` and return the stable library directory.
    ///
    /// Compilation is skipped when the versioned artifact already exists in
    /// the stable directory (or in a leftover staging prefix) and `force` is
    /// not set. The staging prefix is gone when this returns, on every path.
    pub fn build(&self, source_dir: &Path, force: bool) -> Result<PathBuf, ResolveError> {
        let names = self.artifact_names()?;
        let stable_dir = self.layout.stable_library_dir(self.os);
        let stable_artifact = stable_dir.join(&names.versioned);

        let staging = StagingDir::new(self.layout.staging_prefix(&self.recipe.name));
        let staged_artifact = staging.lib_dir().join(&names.versioned);

        if !force && stable_artifact.is_file() {
            tracing::info!(
                "{} already built at {}, skipping",
                self.recipe.name,
                stable_artifact.display()
            );
            self.install_links(&stable_dir, &names)?;
            return Ok(stable_dir);
        }

        if force || !staged_artifact.is_file() {
            self.compile(source_dir, staging.path())?;
        } else {
            tracing::info!("reusing staged {}", staged_artifact.display());
        }

        if !staged_artifact.is_file() {
            return Err(anyhow::anyhow!(
                "build of `{}` finished but {} was not installed",
                self.recipe.name,
                staged_artifact.display()
            )
            .into());
        }

        ensure_dir(&stable_dir)?;
        copy_file(&staged_artifact, &stable_artifact)?;
        self.install_links(&stable_dir, &names)?;

        tracing::info!(
            "installed {} into {}",
            names.versioned,
            stable_dir.display()
        );
        Ok(stable_dir)
    }

    fn artifact_names(&self) -> Result<ArtifactNames, ResolveError> {
        let unsupported = || ResolveError::UnsupportedPlatform {
            package: self.recipe.name.clone(),
            os: self.os,
        };

        if !self.recipe.supports_build_on(self.os) {
            return Err(unsupported());
        }
        self.recipe.artifact_names(self.os).ok_or_else(unsupported)
    }

    fn compile(&self, source_dir: &Path, prefix: &Path) -> Result<(), ResolveError> {
        tracing::info!(
            "Building {} {} from {}",
            self.recipe.name,
            self.recipe.version,
            source_dir.display()
        );

        let configure = source_dir.join("configure");
        let steps = [
            ProcessBuilder::new("autoreconf").arg("-vfi"),
            ProcessBuilder::new(&configure).arg(format!("--prefix={}", prefix.display())),
            ProcessBuilder::new("make").arg(format!("-j{}", self.jobs)),
            ProcessBuilder::new("make").arg("install"),
        ];

        for step in steps {
            self.run_step(&step.cwd(source_dir))?;
        }
        Ok(())
    }

    fn run_step(&self, cmd: &ProcessBuilder) -> Result<(), ResolveError> {
        tracing::info!("Running `{}`", cmd.display_command());

        let output = self
            .runner
            .run(cmd)
            .map_err(|e| ResolveError::ExternalTool {
                command: cmd.display_command(),
                code: None,
                stderr: format!("{:#}", e),
            })?;

        if !output.success() {
            return Err(ResolveError::ExternalTool {
                command: cmd.display_command(),
                code: output.code,
                stderr: tail_lines(&output.stderr, STDERR_TAIL_LINES),
            });
        }
        Ok(())
    }

    fn install_links(&self, stable_dir: &Path, names: &ArtifactNames) -> Result<(), ResolveError> {
        for link in &names.links {
            link_or_copy(Path::new(&names.versioned), &stable_dir.join(link))
                .with_context(|| format!("failed to link {}", link))?;
        }
        Ok(())
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{demo_recipe, fake_autotools, MockExecutor, MockProcessOutput};
    use tempfile::TempDir;

    #[test]
    fn test_build_installs_artifact_and_links() {
        let tmp = TempDir::new().unwrap();
        let layout = PackageLayout::new(tmp.path());
        let recipe = demo_recipe();
        let source = layout.source_dir(&recipe.source_dir);
        std::fs::create_dir_all(&source).unwrap();

        let exec = MockExecutor::new();
        fake_autotools(&exec, "libdemo-1.0.so.0.0.1");

        let stable = AutotoolsBuilder::new(&exec, &recipe, &layout, OsKind::Linux)
            .jobs(2)
            .build(&source, false)
            .unwrap();

        assert_eq!(stable, tmp.path().join("libs/unix"));
        assert!(stable.join("libdemo-1.0.so.0.0.1").is_file());
        assert!(stable.join("libdemo-1.0.so.0").exists());
        assert!(stable.join("libdemo-1.0.so").exists());
        assert!(!layout.staging_prefix("demo").exists());

        let calls = exec.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], "autoreconf -vfi");
        assert!(calls[1].ends_with(&format!(
            "configure --prefix={}",
            layout.staging_prefix("demo").display()
        )));
        assert_eq!(calls[2], "make -j2");
        assert_eq!(calls[3], "make install");
    }

    #[test]
    fn test_second_build_skips_make() {
        let tmp = TempDir::new().unwrap();
        let layout = PackageLayout::new(tmp.path());
        let recipe = demo_recipe();
        let source = layout.source_dir(&recipe.source_dir);
        std::fs::create_dir_all(&source).unwrap();

        let exec = MockExecutor::new();
        fake_autotools(&exec, "libdemo-1.0.so.0.0.1");
        let builder = AutotoolsBuilder::new(&exec, &recipe, &layout, OsKind::Linux);

        let first = builder.build(&source, false).unwrap();
        let second = builder.build(&source, false).unwrap();

        assert_eq!(first, second);
        let make_calls = exec.calls().iter().filter(|c| c.starts_with("make")).count();
        assert_eq!(make_calls, 2); // `make -jN` and `make install`, once
    }

    #[test]
    fn test_force_rebuilds() {
        let tmp = TempDir::new().unwrap();
        let layout = PackageLayout::new(tmp.path());
        let recipe = demo_recipe();
        let source = layout.source_dir(&recipe.source_dir);
        std::fs::create_dir_all(&source).unwrap();

        let exec = MockExecutor::new();
        fake_autotools(&exec, "libdemo-1.0.so.0.0.1");
        let builder = AutotoolsBuilder::new(&exec, &recipe, &layout, OsKind::Linux);

        builder.build(&source, false).unwrap();
        builder.build(&source, true).unwrap();

        assert_eq!(exec.calls().len(), 8);
    }

    #[test]
    fn test_failed_step_aborts_and_cleans_up() {
        let tmp = TempDir::new().unwrap();
        let layout = PackageLayout::new(tmp.path());
        let recipe = demo_recipe();
        let source = layout.source_dir(&recipe.source_dir);
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(layout.staging_prefix("demo")).unwrap();

        let exec = MockExecutor::new();
        exec.expect("autoreconf -vfi", MockProcessOutput::success(""));
        exec.expect_contains("configure", MockProcessOutput::success(""));
        exec.expect_prefix("make -j", MockProcessOutput::failure(2, "error: hunspell.cxx"));

        let err = AutotoolsBuilder::new(&exec, &recipe, &layout, OsKind::Linux)
            .build(&source, false)
            .unwrap_err();

        match err {
            ResolveError::ExternalTool { code, stderr, .. } => {
                assert_eq!(code, Some(2));
                assert!(stderr.contains("hunspell.cxx"));
            }
            other => panic!("expected ExternalTool, got {:?}", other),
        }
        // `make install` never ran
        assert_eq!(exec.calls().len(), 3);
        assert!(!layout.staging_prefix("demo").exists());
        assert!(!layout.stable_library_dir(OsKind::Linux).exists());
    }

    #[test]
    fn test_missing_tool_is_external_failure() {
        let tmp = TempDir::new().unwrap();
        let layout = PackageLayout::new(tmp.path());
        let recipe = demo_recipe();

        let exec = MockExecutor::new();
        let err = AutotoolsBuilder::new(&exec, &recipe, &layout, OsKind::Linux)
            .build(tmp.path(), false)
            .unwrap_err();

        assert!(matches!(err, ResolveError::ExternalTool { code: None, .. }));
    }

    #[test]
    fn test_unsupported_on_windows() {
        let tmp = TempDir::new().unwrap();
        let layout = PackageLayout::new(tmp.path());
        let recipe = demo_recipe();
        let exec = MockExecutor::new();

        let err = AutotoolsBuilder::new(&exec, &recipe, &layout, OsKind::Windows)
            .build(tmp.path(), false)
            .unwrap_err();

        assert!(matches!(err, ResolveError::UnsupportedPlatform { .. }));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_reuses_leftover_staged_artifact() {
        let tmp = TempDir::new().unwrap();
        let layout = PackageLayout::new(tmp.path());
        let recipe = demo_recipe();
        let staged_lib = layout.staging_prefix("demo").join("lib");
        std::fs::create_dir_all(&staged_lib).unwrap();
        std::fs::write(staged_lib.join("libdemo-1.0.0.dylib"), "macho").unwrap();

        let exec = MockExecutor::new();
        let stable = AutotoolsBuilder::new(&exec, &recipe, &layout, OsKind::MacOs)
            .build(tmp.path(), false)
            .unwrap();

        assert!(exec.calls().is_empty());
        assert!(stable.join("libdemo-1.0.0.dylib").is_file());
        assert!(stable.join("libdemo-1.0.dylib").exists());
        assert!(!layout.staging_prefix("demo").exists());
    }

    #[test]
    fn test_tail_lines() {
        assert_eq!(tail_lines("a\nb\nc", 2), "b\nc");
        assert_eq!(tail_lines("a", 5), "a");
    }
}
