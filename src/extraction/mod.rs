// SPDX-License-Identifier: MPL-2.0
//! GPS extraction from raw photo bytes.
//!
//! Extraction is gated on the photo's format and size, then runs the
//! [`ExtractionStrategy`] list in priority order. A result only counts when
//! it passes the coordinate range check. Missing or malformed metadata is a
//! normal outcome and is reported as `None`, never as an error.
//!
//! # Example
//!
//! ```
//! use geotag_lens::extraction::extract;
//!
//! // Too small to hold metadata: the gate rejects it without parsing.
//! assert!(extract(&[0xFF, 0xD8, 0xFF, 0xD9], Some("image/jpeg")).is_none());
//! ```

pub mod dms;
pub mod strategy;
pub mod writer;
pub mod xmp;

pub use strategy::ExtractionStrategy;

use serde::Serialize;

use crate::config::DEFAULT_MIN_EXIF_BYTES;
use crate::domain::geo::GeoCoordinate;
use crate::domain::media::PhotoFormat;
use crate::error::ExtractionFailure;
use crate::validation;

/// ISO base media brands that identify HEIC/HEIF files.
const HEIC_BRANDS: &[&[u8]] = &[b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis"];
const HEIF_BRANDS: &[&[u8]] = &[b"mif1", b"msf1", b"heif"];

/// A coordinate together with the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extracted {
    pub coordinate: GeoCoordinate,
    pub strategy: ExtractionStrategy,
}

/// Extracts GPS coordinates from photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsExtractor {
    min_exif_bytes: usize,
}

impl Default for GpsExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_EXIF_BYTES)
    }
}

impl GpsExtractor {
    /// Creates an extractor; files of `min_exif_bytes` or fewer are skipped.
    #[must_use]
    pub fn new(min_exif_bytes: usize) -> Self {
        Self { min_exif_bytes }
    }

    #[must_use]
    pub fn min_exif_bytes(&self) -> usize {
        self.min_exif_bytes
    }

    /// Returns the coordinate embedded in `bytes`, if any.
    #[must_use]
    pub fn extract(&self, bytes: &[u8], declared_type: Option<&str>) -> Option<GeoCoordinate> {
        self.extract_detailed(bytes, declared_type)
            .ok()
            .map(|extracted| extracted.coordinate)
    }

    /// Like [`extract`](Self::extract), reporting why nothing was found or
    /// which strategy succeeded.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionFailure`] describing the gate that rejected
    /// the file, or [`ExtractionFailure::NoGpsData`] when every strategy ran
    /// without producing an in-range coordinate.
    pub fn extract_detailed(
        &self,
        bytes: &[u8],
        declared_type: Option<&str>,
    ) -> Result<Extracted, ExtractionFailure> {
        check_gate(bytes, declared_type, self.min_exif_bytes)?;

        ExtractionStrategy::ALL
            .iter()
            .find_map(|&strategy| {
                let candidate = strategy.attempt(bytes);
                match candidate {
                    Some(coordinate) if validation::validate(&coordinate).is_valid => {
                        tracing::debug!(%strategy, coordinate = %coordinate.format(), "GPS found");
                        Some(Extracted {
                            coordinate,
                            strategy,
                        })
                    }
                    Some(coordinate) => {
                        tracing::debug!(
                            %strategy,
                            latitude = coordinate.latitude(),
                            longitude = coordinate.longitude(),
                            "GPS out of range, trying next strategy"
                        );
                        None
                    }
                    None => {
                        tracing::debug!(%strategy, "no GPS");
                        None
                    }
                }
            })
            .ok_or(ExtractionFailure::NoGpsData)
    }
}

/// Extracts GPS coordinates using the default size threshold.
#[must_use]
pub fn extract(bytes: &[u8], declared_type: Option<&str>) -> Option<GeoCoordinate> {
    GpsExtractor::default().extract(bytes, declared_type)
}

/// Detailed extraction using the default size threshold.
///
/// # Errors
///
/// See [`GpsExtractor::extract_detailed`].
pub fn extract_detailed(
    bytes: &[u8],
    declared_type: Option<&str>,
) -> Result<Extracted, ExtractionFailure> {
    GpsExtractor::default().extract_detailed(bytes, declared_type)
}

/// Returns whether extraction should be attempted at all.
///
/// The format must be on the EXIF allow-list (JPEG, TIFF, HEIC, HEIF) and
/// the file must be larger than `min_bytes`. Content is sniffed only when
/// the declared type is missing or generic.
#[must_use]
pub fn can_contain_exif(bytes: &[u8], declared_type: Option<&str>, min_bytes: usize) -> bool {
    check_gate(bytes, declared_type, min_bytes).is_ok()
}

fn check_gate(
    bytes: &[u8],
    declared_type: Option<&str>,
    min_bytes: usize,
) -> Result<PhotoFormat, ExtractionFailure> {
    let format = detect_format(bytes, declared_type);
    if !format.may_contain_exif() {
        return Err(ExtractionFailure::UnsupportedFormat);
    }
    if bytes.len() <= min_bytes {
        return Err(ExtractionFailure::TooSmall {
            size: bytes.len(),
            minimum: min_bytes,
        });
    }
    Ok(format)
}

/// Resolves the photo format from the declared type.
///
/// The content is sniffed only when the declaration is missing or generic
/// (see [`PhotoFormat::is_unspecified`]). Any other declaration is taken at
/// its word, so a file declared as `application/pdf` stays
/// [`PhotoFormat::Other`] whatever its bytes look like.
#[must_use]
pub fn detect_format(bytes: &[u8], declared_type: Option<&str>) -> PhotoFormat {
    match declared_type {
        Some(declared) if !PhotoFormat::is_unspecified(declared) => {
            PhotoFormat::from_declared(declared)
        }
        _ => sniff_format(bytes),
    }
}

fn sniff_format(bytes: &[u8]) -> PhotoFormat {
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        let brand = &bytes[8..12];
        if HEIC_BRANDS.contains(&brand) {
            return PhotoFormat::Heic;
        }
        if HEIF_BRANDS.contains(&brand) {
            return PhotoFormat::Heif;
        }
    }

    match image_rs::guess_format(bytes) {
        Ok(image_rs::ImageFormat::Jpeg) => PhotoFormat::Jpeg,
        Ok(image_rs::ImageFormat::Tiff) => PhotoFormat::Tiff,
        Ok(image_rs::ImageFormat::Png) => PhotoFormat::Png,
        Ok(image_rs::ImageFormat::WebP) => PhotoFormat::WebP,
        Ok(image_rs::ImageFormat::Gif) => PhotoFormat::Gif,
        _ => PhotoFormat::Other,
    }
}
