//! Source builds.
//!
//! Compiles an unpacked source tree with the autotools toolchain and installs
//! the resulting shared object into the package-local library directory.

pub mod autotools;
pub mod staging;

pub use autotools::AutotoolsBuilder;
pub use staging::StagingDir;
