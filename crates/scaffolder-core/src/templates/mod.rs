//! Template acquisition and materialization
//!
//! This module provides:
//! - Template sources (remote archive, local bundle, embedded fallback)
//! - Archive fetching with bounded redirect following
//! - Streaming tarball extraction with path rebasing
//! - Local tree copying and the embedded starter site
//! - Latest companion tool version lookup

pub mod copier;
pub mod extractor;
pub mod fallback;
pub mod fetcher;
pub mod version;

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use futures_util::TryStreamExt;
use std::path::{Path, PathBuf};
use tokio_util::io::{StreamReader, SyncIoBridge};
use url::Url;

pub use copier::copy_tree;
pub use extractor::{ExtractError, ExtractOptions};
pub use fallback::{EmbeddedFile, STARTER_SITE};
pub use fetcher::{ArchiveFetcher, FetchError};
pub use version::{VersionError, VersionResolver};

/// Template source - where the initial site files come from
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(Url),
    LocalBundle(PathBuf),
    EmbeddedFallback(&'static [EmbeddedFile]),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.template_url_env())
            .unwrap_or_else(|_| config.default_template_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::LocalBundle(path)
    }
}

/// Kind of a materialized path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A path written under the destination root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub relative_path: PathBuf,
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Failure of a remote acquisition attempt; always recoverable via the fallback
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Which path populated the source folder
#[derive(Debug)]
pub enum Acquisition {
    /// Extracted from the remote archive (`url` is the final, post-redirect URL)
    Fetched { url: Url, entries: Vec<FileEntry> },

    /// Mirrored from a local template bundle
    Copied { from: PathBuf, entries: Vec<FileEntry> },

    /// The embedded starter site was requested up front (offline mode)
    Embedded { entries: Vec<FileEntry> },

    /// The remote attempt failed and the embedded starter site was written
    FellBack {
        reason: AcquireError,
        entries: Vec<FileEntry>,
    },
}

impl Acquisition {
    pub fn entries(&self) -> &[FileEntry] {
        match self {
            Acquisition::Fetched { entries, .. }
            | Acquisition::Copied { entries, .. }
            | Acquisition::Embedded { entries }
            | Acquisition::FellBack { entries, .. } => entries,
        }
    }

    /// Number of regular files written
    pub fn file_count(&self) -> usize {
        self.entries().iter().filter(|e| e.is_file()).count()
    }

    pub fn fell_back(&self) -> bool {
        matches!(self, Acquisition::FellBack { .. })
    }
}

/// Fetch the archive at `url` and stream it into `dest`
///
/// Returns the final URL after redirects together with the written entries.
pub async fn fetch_and_extract(
    fetcher: &ArchiveFetcher,
    url: &Url,
    dest: &Path,
    options: &ExtractOptions,
) -> Result<(Url, Vec<FileEntry>), AcquireError> {
    let (final_url, response) = fetcher.fetch(url).await?;

    let stream = Box::pin(response.bytes_stream().map_err(std::io::Error::other));
    let reader = SyncIoBridge::new(StreamReader::new(stream));

    let dest = dest.to_path_buf();
    let options = options.clone();
    let entries = tokio::task::spawn_blocking(move || extractor::extract(reader, &dest, &options))
        .await
        .map_err(ExtractError::from)??;

    Ok((final_url, entries))
}
