//! High-level operations.
//!
//! This module contains the implementation of libscout commands.

pub mod resolve;
pub mod session;
pub mod toolset;

pub use resolve::{ResolveOptions, Resolver};
pub use session::{
    build_package, configure, fetch_package, resolve_options, resolve_packages, Session,
};
pub use toolset::select_toolset;
