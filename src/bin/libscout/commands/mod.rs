//! Command implementations

pub mod build;
pub mod completions;
pub mod fetch;
pub mod platform;
pub mod resolve;
