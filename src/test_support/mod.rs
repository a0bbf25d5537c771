//! Test utilities and mocks for libscout unit tests.
//!
//! The pipeline talks to the outside world through two seams: external
//! commands ([`CommandRunner`]) and downloads ([`Downloader`]). The mocks here
//! script both so tests never need pkg-config, a compiler toolchain, or the
//! network.
//!
//! # Example
//!
//! ```rust,ignore
//! use libscout::test_support::{MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let exec = MockExecutor::new();
//!     exec.expect("pkg-config --libs --cflags zlib", MockProcessOutput::success("-lz"));
//!
//!     // Pass `&exec` wherever a `&dyn CommandRunner` is expected...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::sources::download::Downloader;
use crate::util::process::{CommandRunner, ProcessBuilder, ProcessOutput};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(out: MockProcessOutput) -> Self {
        ProcessOutput {
            code: Some(out.status),
            stdout: out.stdout,
            stderr: out.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// Side effect run when a command matches, e.g. `make install` writing files.
pub type CommandHook = Arc<dyn Fn(&ProcessBuilder) + Send + Sync>;

/// Expectation for a command execution.
#[derive(Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: MockProcessOutput,
    /// Runs before the output is returned.
    pub hook: Option<CommandHook>,
}

impl CommandExpectation {
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            hook: None,
        }
    }
}

#[derive(Default)]
struct ExecutorState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
}

/// Mock process executor for testing command execution.
///
/// Records every command it is asked to run. A command matching no
/// expectation fails to "spawn", which is how a missing tool looks to the
/// code under test.
#[derive(Default)]
pub struct MockExecutor {
    state: Mutex<ExecutorState>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, expectation: CommandExpectation) -> &Self {
        self.lock().expectations.push(expectation);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ExecutorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    /// Add an expectation with a side effect.
    pub fn expect_with<F>(
        &self,
        pattern: CommandPattern,
        output: MockProcessOutput,
        hook: F,
    ) -> &Self
    where
        F: Fn(&ProcessBuilder) + Send + Sync + 'static,
    {
        self.push(CommandExpectation {
            pattern,
            output,
            hook: Some(Arc::new(hook)),
        })
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }
}

impl CommandRunner for MockExecutor {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let full_cmd = cmd.display_command();

        let matched = {
            let mut state = self.lock();
            state.calls.push(full_cmd.clone());
            state
                .expectations
                .iter()
                .find(|exp| exp.pattern.matches(&full_cmd))
                .cloned()
        };

        match matched {
            Some(exp) => {
                if let Some(hook) = &exp.hook {
                    hook(cmd);
                }
                Ok(exp.output.into())
            }
            None => bail!("unexpected command: {}", full_cmd),
        }
    }
}

/// Mock HTTP client for testing tarball downloads.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    responses: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn mock_url(&self, url: &str, body: Vec<u8>) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.to_string(), body);
        self
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

impl Downloader for MockHttpClient {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        let body = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(url)
            .cloned();

        match body {
            Some(body) => {
                std::fs::write(dest, body)?;
                Ok(())
            }
            None => bail!("HTTP 404 Not Found: {}", url),
        }
    }
}
