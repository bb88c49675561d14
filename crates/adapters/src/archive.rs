// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extraction of downloaded results archives

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: std::io::Error },

    #[error("invalid archive {path}: {source}")]
    Zip { path: PathBuf, source: zip::result::ZipError },

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Unpack `archive` into `dest`, returning the number of entries.
///
/// Entries whose paths would escape `dest` are rejected by the zip crate.
pub async fn extract(archive: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || extract_blocking(&archive, &dest)).await?
}

fn extract_blocking(archive: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let file = std::fs::File::open(archive)
        .map_err(|source| ArchiveError::Open { path: archive.to_path_buf(), source })?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|source| ArchiveError::Zip { path: archive.to_path_buf(), source })?;
    let entries = zip.len();
    zip.extract(dest).map_err(|source| ArchiveError::Zip { path: archive.to_path_buf(), source })?;
    tracing::debug!(archive = %archive.display(), entries, "extracted results");
    Ok(entries)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
