//! Core data structures for libscout.
//!
//! This module contains the foundational types used throughout libscout:
//! - The host platform profile
//! - Source-build recipes and package-local layout
//! - The emitted build configuration
//! - Pipeline errors

pub mod build_config;
pub mod errors;
pub mod layout;
pub mod package;
pub mod platform;

pub use build_config::{BuildConfiguration, LinkerReference, ResolvedArtifact};
pub use errors::ResolveError;
pub use layout::PackageLayout;
pub use package::{ArtifactNames, PackageCatalog, PackageRecipe};
pub use platform::{ArchTag, HostEnv, OsKind, PlatformProfile};
