//! Local template bundle copying

use super::{EntryKind, FileEntry};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

/// Mirror `src_dir` into `dest_dir`, creating `dest_dir` if needed
///
/// Bundles are trusted, so every file and directory is copied as-is.
pub async fn copy_tree(src_dir: &Path, dest_dir: &Path) -> Result<Vec<FileEntry>> {
    fs::create_dir_all(dest_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", dest_dir.display()))?;

    let mut copied = Vec::new();

    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to read template bundle {}", src_dir.display()))?;
        let relative_path = entry.path().strip_prefix(src_dir)?.to_path_buf();
        let target_path = dest_dir.join(&relative_path);

        let kind = if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path).await.with_context(|| {
                format!("Failed to create directory: {}", target_path.display())
            })?;
            EntryKind::Directory
        } else {
            fs::copy(entry.path(), &target_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to copy {} to {}",
                        entry.path().display(),
                        target_path.display()
                    )
                })?;
            EntryKind::File
        };

        copied.push(FileEntry {
            relative_path,
            kind,
        });
    }

    Ok(copied)
}
