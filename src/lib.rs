//! libscout - locate native libraries and produce linker configuration
//!
//! Given logical library names, libscout asks pkg-config, searches the
//! platform's conventional directories, and as a last resort downloads and
//! builds the library from source, returning the include directories,
//! library directories and linker names a native extension build needs.
//!
//! ```rust,ignore
//! // build.rs
//! let config = libscout::configure(["hunspell"])?;
//! for line in config.to_cargo_directives() {
//!     println!("{}", line);
//! }
//! ```

pub mod builder;
pub mod core;
pub mod ops;
pub mod search;
pub mod sources;
pub mod util;

/// Test utilities and mocks for libscout unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides scripted implementations of command execution and downloads.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildConfiguration, OsKind, PlatformProfile, ResolveError};
pub use ops::{configure, ResolveOptions, Resolver};
pub use util::context::GlobalContext;
