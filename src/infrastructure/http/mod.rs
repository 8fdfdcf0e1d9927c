// SPDX-License-Identifier: MPL-2.0
//! HTTP adapter implementing the [`PhotoFetcher`] port trait.
//!
//! Photos are streamed into memory with a hard size cap. The declared type
//! comes from the `Content-Type` header, falling back to the URL itself so
//! its extension can be classified.
//!
//! [`PhotoFetcher`]: crate::application::port::PhotoFetcher

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::application::port::{FetchedPhoto, PhotoFetcher};
use crate::config::MAX_PHOTO_BYTES;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("GeotagLens/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

/// `reqwest`-based photo fetcher.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpPhotoFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpPhotoFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            max_bytes: MAX_PHOTO_BYTES,
        })
    }

    /// Overrides the body size cap.
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    async fn download(&self, url: &str) -> Result<FetchedPhoto, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes)
        {
            return Err(FetchError::TooLarge(self.max_bytes));
        }

        let declared_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| Some(url.to_string()));

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Network(e.to_string()))?;
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(FetchError::TooLarge(self.max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(FetchedPhoto::new(bytes, declared_type))
    }
}

impl PhotoFetcher for HttpPhotoFetcher {
    async fn fetch(&self, reference: &str) -> Result<FetchedPhoto, FetchError> {
        let url = reference.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FetchError::Network(format!("Unsupported URL: {url}")));
        }

        let result = self.download(url).await;
        match &result {
            Ok(photo) => tracing::debug!(url, bytes = photo.len(), "photo fetched"),
            Err(e) => tracing::warn!(url, error = %e, "photo fetch failed"),
        }
        result
    }
}
