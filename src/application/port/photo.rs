// SPDX-License-Identifier: MPL-2.0
//! Photo retrieval port.

use crate::error::FetchError;
use std::future::Future;

/// Raw bytes of a fetched photo plus the type its source declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPhoto {
    pub bytes: Vec<u8>,

    /// MIME type from the transport, or the file name when none was given.
    pub declared_type: Option<String>,
}

impl FetchedPhoto {
    #[must_use]
    pub fn new(bytes: Vec<u8>, declared_type: Option<String>) -> Self {
        Self {
            bytes,
            declared_type,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Trait for retrieving photo bytes from a reference.
///
/// Implementations own their timeouts. A failed fetch is reported as a
/// [`FetchError`] and the caller moves on to the next reference.
///
/// # Example
///
/// ```ignore
/// struct InMemory(HashMap<String, Vec<u8>>);
///
/// impl PhotoFetcher for InMemory {
///     async fn fetch(&self, reference: &str) -> Result<FetchedPhoto, FetchError> {
///         let bytes = self.0.get(reference).cloned().ok_or(FetchError::EmptyBody)?;
///         Ok(FetchedPhoto::new(bytes, Some(reference.to_string())))
///     }
/// }
/// ```
pub trait PhotoFetcher: Send + Sync {
    /// Fetches the photo behind `reference`.
    fn fetch(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<FetchedPhoto, FetchError>> + Send;
}

impl<T: PhotoFetcher> PhotoFetcher for &T {
    fn fetch(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<FetchedPhoto, FetchError>> + Send {
        (**self).fetch(reference)
    }
}
