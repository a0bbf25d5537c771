//! Idempotent source acquisition.
//!
//! An archive that is already present at the destination is never downloaded
//! again; the archive and the tree it unpacks into are left in place so later
//! runs can rely on them.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use url::Url;

use crate::core::ResolveError;
use crate::sources::archive::extract_tarball_file;

/// Fetches a URL into a local file.
pub trait Downloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Blocking HTTP(S) downloads via reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpDownloader {
    show_progress: bool,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a progress bar on stderr while downloading.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, len: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        match len {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::with_template(
                    "{spinner} Downloading [{bar:30}] {bytes}/{total_bytes}",
                ) {
                    pb.set_style(style.progress_chars("=> "));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_message("Downloading");
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
        }
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let mut response =
            reqwest::blocking::get(url).with_context(|| format!("request to {} failed", url))?;

        if !response.status().is_success() {
            bail!("HTTP {}", response.status());
        }

        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;

        let pb = self.progress_bar(response.content_length());
        {
            let mut writer = pb.wrap_write(tmp.as_file_mut());
            response
                .copy_to(&mut writer)
                .context("failed to read response body")?;
            writer.flush()?;
        }
        pb.finish_and_clear();

        tmp.persist(dest)
            .with_context(|| format!("failed to write {}", dest.display()))?;
        Ok(())
    }
}

/// What [`SourceFetcher::fetch`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive was already present; nothing was touched
    Skipped { archive: PathBuf },
    /// The archive was downloaded and extracted
    Downloaded { archive: PathBuf },
}

impl FetchOutcome {
    pub fn archive(&self) -> &Path {
        match self {
            FetchOutcome::Skipped { archive } | FetchOutcome::Downloaded { archive } => archive,
        }
    }
}

/// Downloads and unpacks source archives.
pub struct SourceFetcher<'a> {
    downloader: &'a dyn Downloader,
}

impl<'a> SourceFetcher<'a> {
    pub fn new(downloader: &'a dyn Downloader) -> Self {
        SourceFetcher { downloader }
    }

    /// Download `url` into `destination` and extract it there.
    ///
    /// With `skip_if_present`, an existing archive of the same file name makes
    /// this a no-op without any network access. A pinned `sha256` is checked
    /// before extraction; a mismatching archive is deleted.
    pub fn fetch(
        &self,
        url: &str,
        destination: &Path,
        skip_if_present: bool,
        sha256: Option<&str>,
    ) -> Result<FetchOutcome, ResolveError> {
        let archive = archive_path(url, destination)?;

        if skip_if_present && archive.exists() {
            tracing::info!(
                "File already found: {}, skipping download of {}",
                archive.display(),
                url
            );
            return Ok(FetchOutcome::Skipped { archive });
        }

        std::fs::create_dir_all(destination).with_context(|| {
            format!("failed to create directory: {}", destination.display())
        })?;

        tracing::info!("Downloading {} to {}", url, archive.display());
        self.downloader
            .download(url, &archive)
            .map_err(|e| ResolveError::Network {
                url: url.to_string(),
                message: format!("{:#}", e),
            })?;

        if let Some(expected) = sha256 {
            verify_checksum(url, &archive, expected)?;
        }

        tracing::info!("Extracting {} to {}", archive.display(), destination.display());
        if let Err(e) = extract_tarball_file(&archive, destination) {
            discard_archive(&archive);
            return Err(ResolveError::Extraction {
                archive,
                message: format!("{:#}", e),
            });
        }

        Ok(FetchOutcome::Downloaded { archive })
    }
}

/// Local path of the archive for `url` inside `directory`.
pub fn archive_path(url: &str, directory: &Path) -> Result<PathBuf, ResolveError> {
    Ok(directory.join(file_name_from_url(url)?))
}

/// Last path segment of a URL (`.../archive/v1.6.2.tar.gz` → `v1.6.2.tar.gz`).
pub fn file_name_from_url(url: &str) -> Result<String, ResolveError> {
    let parsed = Url::parse(url).with_context(|| format!("invalid source URL: {}", url))?;

    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("source URL has no file name: {}", url).into())
}

/// Delete an unusable archive so the next run downloads it again instead of
/// skipping on its presence.
pub fn discard_archive(archive: &Path) {
    if let Err(e) = std::fs::remove_file(archive) {
        tracing::warn!("failed to remove {}: {}", archive.display(), e);
    } else {
        tracing::debug!("removed unusable archive {}", archive.display());
    }
}

fn verify_checksum(url: &str, archive: &Path, expected: &str) -> Result<(), ResolveError> {
    let bytes = std::fs::read(archive)
        .with_context(|| format!("failed to read {}", archive.display()))?;
    let actual = hex::encode(Sha256::digest(&bytes));

    if !actual.eq_ignore_ascii_case(expected) {
        discard_archive(archive);
        return Err(ResolveError::ChecksumMismatch {
            url: url.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }

    tracing::debug!("Archive hash verified: {}", &actual[..16]);
    Ok(())
}
