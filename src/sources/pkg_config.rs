//! pkg-config fast path.
//!
//! When the host package manager knows the library, its `--cflags --libs`
//! output is already a complete, self-contained configuration. Any failure to
//! get that output is an expected outcome that sends the pipeline on to the
//! filesystem search.

use crate::core::BuildConfiguration;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Result of asking pkg-config about a set of packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found(BuildConfiguration),
    /// pkg-config could not answer; carries the reason for logging
    Fallback(String),
}

/// Runs the host package-config tool.
pub struct PkgConfigProbe<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
}

impl<'a> PkgConfigProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        PkgConfigProbe {
            runner,
            program: "pkg-config".to_string(),
        }
    }

    /// Use a different pkg-config executable (e.g. `pkgconf`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Ask for combined compiler and linker flags for `packages`.
    pub fn probe(&self, packages: &[String]) -> ProbeOutcome {
        if packages.is_empty() {
            return ProbeOutcome::Fallback("no packages requested".to_string());
        }

        let cmd = ProcessBuilder::new(&self.program)
            .args(["--libs", "--cflags"])
            .args(packages);

        let output = match self.runner.run(&cmd) {
            Ok(output) => output,
            Err(e) => {
                return ProbeOutcome::Fallback(format!("{} unavailable: {:#}", self.program, e))
            }
        };

        if !output.success() {
            let reason = output.stderr.trim();
            return ProbeOutcome::Fallback(if reason.is_empty() {
                format!("`{}` exited with {:?}", cmd.display_command(), output.code)
            } else {
                reason.to_string()
            });
        }

        let config = parse_flags(&output.stdout);
        if config.is_empty() {
            return ProbeOutcome::Fallback(format!(
                "`{}` printed no flags",
                cmd.display_command()
            ));
        }

        ProbeOutcome::Found(config)
    }
}

/// Classify pkg-config flags by their two-character prefix.
///
/// `-I`, `-L` and `-l` land in their own collections; every other token is
/// kept verbatim as an extra link argument.
pub fn parse_flags(output: &str) -> BuildConfiguration {
    let mut config = BuildConfiguration::new();

    for token in output.split_whitespace() {
        match token.get(..2) {
            Some("-I") if token.len() > 2 => {
                config.include_directories.insert(token[2..].into());
            }
            Some("-L") if token.len() > 2 => {
                config.library_directories.insert(token[2..].into());
            }
            Some("-l") if token.len() > 2 => {
                config.add_library(&token[2..]);
            }
            _ => {
                config.extra_link_arguments.insert(token.to_string());
            }
        }
    }

    config
}
