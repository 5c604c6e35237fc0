//! Streaming `.tar.gz` extraction with component stripping and subdirectory rebasing
//!
//! Starter archives look like `<repo>-<ref>/src/...`. With one stripped
//! component and the `src` marker, `<repo>-<ref>/src/assets/main.css` lands at
//! `<dest>/assets/main.css` and everything outside `src/` is ignored.

use super::{EntryKind, FileEntry};
use flate2::read::GzDecoder;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read template archive: {0}")]
    Read(#[source] io::Error),

    #[error("archive entry '{entry}' escapes the destination directory")]
    UnsafePath { entry: PathBuf },

    #[error("failed to extract '{path}': {source}")]
    Entry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template archive contains no files under '{subdir}/'")]
    Empty { subdir: String },

    #[error("extraction task did not complete: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// How archive entry paths map onto the destination
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Leading segments dropped from every entry (the archive's root folder)
    pub strip_components: usize,

    /// Marker segment; only entries below it are kept, rebased to just below it
    pub subdir: String,
}

impl ExtractOptions {
    pub fn new(subdir: impl Into<String>) -> Self {
        Self {
            strip_components: 0,
            subdir: subdir.into(),
        }
    }

    pub fn strip_components(mut self, count: usize) -> Self {
        self.strip_components = count;
        self
    }

    /// Map an archive entry path to a destination-relative path
    ///
    /// `Ok(None)` means the entry is filtered out. Absolute entries, and `..`
    /// segments left after rebasing, are rejected.
    pub fn rebase(&self, entry_path: &Path) -> Result<Option<PathBuf>, ExtractError> {
        let unsafe_path = || ExtractError::UnsafePath {
            entry: entry_path.to_path_buf(),
        };

        let mut components = Vec::new();
        for component in entry_path.components() {
            match component {
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => return Err(unsafe_path()),
                other => components.push(other),
            }
        }

        let Some(stripped) = components.get(self.strip_components..) else {
            return Ok(None);
        };

        let marker = OsStr::new(&self.subdir);
        let Some(position) = stripped.iter().position(|c| c.as_os_str() == marker) else {
            return Ok(None);
        };

        let rebased = &stripped[position + 1..];
        if rebased.is_empty() {
            return Ok(None);
        }
        if rebased.iter().any(|c| matches!(c, Component::ParentDir)) {
            return Err(unsafe_path());
        }

        Ok(Some(rebased.iter().collect()))
    }
}

/// Extract a gzip-compressed tar stream into `dest`
///
/// Stops at the first error. Entries written before the failure stay on disk.
pub fn extract<R: Read>(
    reader: R,
    dest: &Path,
    options: &ExtractOptions,
) -> Result<Vec<FileEntry>, ExtractError> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    let mut written = Vec::new();

    for entry in archive.entries().map_err(ExtractError::Read)? {
        let mut entry = entry.map_err(ExtractError::Read)?;

        let entry_type = entry.header().entry_type();
        let kind = if entry_type.is_dir() {
            EntryKind::Directory
        } else if entry_type.is_file() {
            EntryKind::File
        } else {
            // symlinks, hard links and pax headers
            trace!(?entry_type, "skipping archive entry");
            continue;
        };

        let entry_path = entry.path().map_err(ExtractError::Read)?.into_owned();
        let Some(relative_path) = options.rebase(&entry_path)? else {
            continue;
        };

        let target = dest.join(&relative_path);
        let write_failed = |source| ExtractError::Entry {
            path: target.clone(),
            source,
        };

        match kind {
            EntryKind::Directory => fs::create_dir_all(&target).map_err(write_failed)?,
            EntryKind::File => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(write_failed)?;
                }
                let mut file = fs::File::create(&target).map_err(write_failed)?;
                io::copy(&mut entry, &mut file).map_err(write_failed)?;
            }
        }

        trace!(path = %relative_path.display(), "extracted");
        written.push(FileEntry {
            relative_path,
            kind,
        });
    }

    if !written.iter().any(FileEntry::is_file) {
        return Err(ExtractError::Empty {
            subdir: options.subdir.clone(),
        });
    }

    debug!(entries = written.len(), dest = %dest.display(), "archive extracted");
    Ok(written)
}
