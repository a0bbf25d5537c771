//! Where library configuration comes from.
//!
//! Either the host package-config tool already knows the library, or the
//! sources are downloaded and unpacked so they can be built locally.

pub mod archive;
pub mod download;
pub mod pkg_config;

pub use download::{Downloader, FetchOutcome, HttpDownloader, SourceFetcher};
pub use pkg_config::{PkgConfigProbe, ProbeOutcome};
