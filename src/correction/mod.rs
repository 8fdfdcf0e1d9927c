// SPDX-License-Identifier: MPL-2.0
//! Precision upgrades for stored locations.
//!
//! Stored locations are geohashes, and older ones are often short (a few
//! kilometers across). When such a location has photos attached, the GPS
//! position embedded in a photo can replace the coarse cell:
//!
//! 1. [`identify_low_precision_markers`] decodes records shorter than the
//!    threshold and gathers their photo references.
//! 2. [`CorrectionPipeline::batch_correct`] fetches photos one at a time,
//!    stops at the first one with GPS data and scores a [`Correction`].
//! 3. [`apply_corrections`] replaces the markers whose correction is
//!    confident enough; the rest are returned unchanged.
//! 4. [`CorrectionStats`] summarizes a run for review.

pub mod confidence;
pub mod identify;
pub mod pipeline;
pub mod stats;

pub use confidence::{compute_confidence, is_applicable};
pub use identify::{
    collect_photo_refs, identify_low_precision_markers, is_image_url, LocationRecord,
    PrecisionMarker,
};
pub use pipeline::{
    apply_corrections, AppliedCorrections, AttemptOutcome, CandidateState, CorrectionPipeline,
};
pub use stats::{stats, CorrectionStats};

use serde::Serialize;

use crate::config::{DEFAULT_APPLY_THRESHOLD, DEFAULT_MIN_EXIF_BYTES};
use crate::domain::geo::{haversine_distance, GeoCoordinate, GeohashPrecision, MaxCorrections};
use crate::error::GeohashError;
use crate::extraction::ExtractionStrategy;
use crate::geohash;

/// Tunables of a correction run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Geohashes shorter than this are candidates.
    pub precision_threshold: GeohashPrecision,
    /// Length of the corrected geohash.
    pub target_precision: GeohashPrecision,
    /// Markers processed per batch.
    pub max_corrections: MaxCorrections,
    /// Corrections are applied only above this confidence.
    pub apply_threshold: f64,
    /// Photos of this size or smaller are not parsed.
    pub min_exif_bytes: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            precision_threshold: GeohashPrecision::default_threshold(),
            target_precision: GeohashPrecision::default(),
            max_corrections: MaxCorrections::default(),
            apply_threshold: DEFAULT_APPLY_THRESHOLD,
            min_exif_bytes: DEFAULT_MIN_EXIF_BYTES,
        }
    }
}

/// A coordinate recovered from a photo for one marker.
///
/// Only the pipeline creates these; the confidence is always in `[0, 1]`
/// and the distance is always the great-circle distance between the
/// original and recovered coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correction {
    marker_id: String,
    original_geohash: String,
    original_precision: u8,
    original_coordinate: GeoCoordinate,
    recovered_coordinate: GeoCoordinate,
    corrected_geohash: String,
    corrected_precision: u8,
    distance_meters: f64,
    confidence: f64,
    photo_source: String,
    strategy: ExtractionStrategy,
}

impl Correction {
    pub(crate) fn compute(
        marker: &PrecisionMarker,
        recovered: GeoCoordinate,
        photo_source: &str,
        strategy: ExtractionStrategy,
        target_precision: GeohashPrecision,
    ) -> Result<Self, GeohashError> {
        let corrected_geohash = geohash::encode(&recovered, target_precision.value())?;
        let distance_meters = haversine_distance(&marker.coordinate(), &recovered);
        let confidence =
            compute_confidence(marker.precision(), target_precision.value(), distance_meters);

        Ok(Self {
            marker_id: marker.id().to_string(),
            original_geohash: marker.geohash().to_string(),
            original_precision: marker.precision(),
            original_coordinate: marker.coordinate(),
            recovered_coordinate: recovered,
            corrected_geohash,
            corrected_precision: target_precision.value(),
            distance_meters,
            confidence,
            photo_source: photo_source.to_string(),
            strategy,
        })
    }

    #[must_use]
    pub fn marker_id(&self) -> &str {
        &self.marker_id
    }

    #[must_use]
    pub fn original_geohash(&self) -> &str {
        &self.original_geohash
    }

    #[must_use]
    pub fn original_precision(&self) -> u8 {
        self.original_precision
    }

    #[must_use]
    pub fn original_coordinate(&self) -> GeoCoordinate {
        self.original_coordinate
    }

    #[must_use]
    pub fn recovered_coordinate(&self) -> GeoCoordinate {
        self.recovered_coordinate
    }

    #[must_use]
    pub fn corrected_geohash(&self) -> &str {
        &self.corrected_geohash
    }

    #[must_use]
    pub fn corrected_precision(&self) -> u8 {
        self.corrected_precision
    }

    #[must_use]
    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Photo reference the coordinate was recovered from.
    #[must_use]
    pub fn photo_source(&self) -> &str {
        &self.photo_source
    }

    #[must_use]
    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    /// Key used by the precision histogram, e.g. `"5→8"`.
    #[must_use]
    pub fn precision_change(&self) -> String {
        format!("{}→{}", self.original_precision, self.corrected_precision)
    }
}
