//! Tarball extraction.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;

/// Extract a gzip-compressed tarball file into `dest`.
pub fn extract_tarball_file(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)
        .with_context(|| format!("failed to open archive: {}", archive.display()))?;
    extract_tarball(file, dest)
}

/// Extract a gzip-compressed tarball stream into `dest`.
///
/// Entries keep their full paths (GitHub release tarballs unpack into a
/// `<name>-<version>/` directory). Entries that would escape `dest` are
/// rejected.
pub fn extract_tarball(reader: impl Read, dest: &Path) -> Result<()> {
    let mut archive = Archive::new(GzDecoder::new(reader));

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create destination directory: {}", dest.display()))?;

    for entry in archive
        .entries()
        .context("failed to read tarball entries")?
    {
        let mut entry = entry.context("failed to read tarball entry")?;
        let entry_path = entry.path().context("failed to get entry path")?.into_owned();

        if entry_path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            bail!(
                "tarball entry escapes destination directory: {}",
                entry_path.display()
            );
        }

        let entry_type = entry.header().entry_type();
        match entry_type {
            tar::EntryType::Directory
            | tar::EntryType::Regular
            | tar::EntryType::Continuous
            | tar::EntryType::Symlink
            | tar::EntryType::Link => {
                entry.unpack_in(dest).with_context(|| {
                    format!("failed to extract {}", entry_path.display())
                })?;
            }
            // pax/GNU metadata headers are consumed by the tar reader itself
            _ => {
                tracing::debug!(
                    "Skipping unsupported entry type {:?}: {}",
                    entry_type,
                    entry_path.display()
                );
            }
        }
    }

    Ok(())
}
