// SPDX-License-Identifier: MPL-2.0
//! Local filesystem adapter implementing the [`PhotoFetcher`] port trait.
//!
//! References may be `file://` URLs or plain paths; relative paths are
//! resolved against the fetcher's root directory.
//!
//! [`PhotoFetcher`]: crate::application::port::PhotoFetcher

use std::path::{Path, PathBuf};

use crate::application::port::{FetchedPhoto, PhotoFetcher};
use crate::config::MAX_PHOTO_BYTES;
use crate::error::FetchError;

/// Reads photos from disk with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct FilePhotoFetcher {
    root: PathBuf,
}

impl FilePhotoFetcher {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a reference to a path on disk.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let reference = reference.trim();
        let path = reference.strip_prefix("file://").unwrap_or(reference);
        // Absolute paths replace the root when joined.
        self.root.join(path)
    }
}

impl PhotoFetcher for FilePhotoFetcher {
    async fn fetch(&self, reference: &str) -> Result<FetchedPhoto, FetchError> {
        let path = self.resolve(reference);

        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "photo not readable");
            FetchError::Io(format!("{}: {e}", path.display()))
        })?;
        if metadata.len() > MAX_PHOTO_BYTES {
            return Err(FetchError::TooLarge(MAX_PHOTO_BYTES));
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {e}", path.display())))?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "photo read");
        let declared_type = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string);
        Ok(FetchedPhoto::new(bytes, declared_type))
    }
}
