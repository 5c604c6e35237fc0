//! Embedded starter site used when the remote template is unavailable

use super::{EntryKind, FileEntry};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A file compiled into the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedFile {
    /// Path relative to the source folder, `/`-separated
    pub path: &'static str,
    pub contents: &'static str,
}

macro_rules! embed {
    ($path:literal) => {
        EmbeddedFile {
            path: $path,
            contents: include_str!(concat!("../../starter/", $path)),
        }
    };
}

/// Minimal working site: a page, a shared head include and a stylesheet
pub static STARTER_SITE: &[EmbeddedFile] = &[
    embed!("index.html"),
    embed!("_includes/head.html"),
    embed!("assets/main.css"),
];

/// Write every embedded file under `dest`, replacing whatever is already there
///
/// Files left behind by an earlier attempt are not removed.
pub async fn materialize(files: &[EmbeddedFile], dest: &Path) -> Result<Vec<FileEntry>> {
    fs::create_dir_all(dest)
        .await
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let relative_path = PathBuf::from(file.path);
        let target_path = dest.join(&relative_path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, file.contents)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        written.push(FileEntry {
            relative_path,
            kind: EntryKind::File,
        });
    }

    Ok(written)
}
