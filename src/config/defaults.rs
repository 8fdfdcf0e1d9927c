// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Geohash**: Precision bounds and pipeline precision targets
//! - **Batch**: Correction batch sizing
//! - **Confidence**: Scoring constants for automatic corrections
//! - **Extraction**: EXIF gate thresholds
//! - **Fetch**: Photo fetch tolerances
//!
//! The confidence constants are coarse, uncalibrated heuristics kept for
//! compatibility with previously scored data. Only the apply threshold is
//! read from the settings file; the distance bands, factors, boost and
//! precision-gain divisor are fixed at compile time.

// ==========================================================================
// Geohash Defaults
// ==========================================================================

/// Smallest geohash precision the codec accepts.
pub const MIN_GEOHASH_PRECISION: u8 = 1;

/// Largest geohash precision the codec accepts.
pub const MAX_GEOHASH_PRECISION: u8 = 12;

/// Markers with a geohash shorter than this are candidates for correction.
pub const DEFAULT_PRECISION_THRESHOLD: u8 = 6;

/// Precision used when re-encoding a recovered coordinate.
pub const DEFAULT_TARGET_PRECISION: u8 = 8;

// ==========================================================================
// Batch Defaults
// ==========================================================================

/// Default number of markers corrected per batch run.
pub const DEFAULT_MAX_CORRECTIONS: usize = 10;

/// Minimum number of markers per batch run.
pub const MIN_MAX_CORRECTIONS: usize = 1;

/// Maximum number of markers per batch run.
pub const MAX_MAX_CORRECTIONS: usize = 500;

// ==========================================================================
// Confidence Defaults
// ==========================================================================

/// Corrections strictly above this confidence are applied.
pub const DEFAULT_APPLY_THRESHOLD: f64 = 0.5;

/// Corrections strictly above this confidence count as high confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Precision gain that maps to a base confidence of 1.0.
pub const PRECISION_GAIN_DIVISOR: f64 = 5.0;

/// Distance bands (meters) and the factor applied above each band.
pub const FAR_DISTANCE_METERS: f64 = 10_000.0;
pub const FAR_DISTANCE_FACTOR: f64 = 0.3;
pub const MEDIUM_DISTANCE_METERS: f64 = 1_000.0;
pub const MEDIUM_DISTANCE_FACTOR: f64 = 0.6;
pub const NEAR_DISTANCE_METERS: f64 = 100.0;
pub const NEAR_DISTANCE_FACTOR: f64 = 0.8;

/// Boost for recovered coordinates that land close to the stored one.
pub const CLOSE_MATCH_METERS: f64 = 50.0;
pub const CLOSE_MATCH_BOOST: f64 = 1.2;
pub const CLOSE_MATCH_MIN_GAIN: u8 = 2;

// ==========================================================================
// Extraction Defaults
// ==========================================================================

/// Files at or below this size are never parsed for EXIF.
pub const DEFAULT_MIN_EXIF_BYTES: usize = 128;

// ==========================================================================
// Fetch Defaults
// ==========================================================================

/// Default timeout for a single photo fetch (in seconds).
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Minimum fetch timeout (in seconds).
pub const MIN_FETCH_TIMEOUT_SECS: u64 = 1;

/// Maximum fetch timeout (in seconds).
pub const MAX_FETCH_TIMEOUT_SECS: u64 = 120;

/// Largest photo body a fetcher will buffer (64 MiB).
pub const MAX_PHOTO_BYTES: u64 = 64 * 1024 * 1024;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_GEOHASH_PRECISION <= DEFAULT_PRECISION_THRESHOLD);
    assert!(DEFAULT_PRECISION_THRESHOLD <= DEFAULT_TARGET_PRECISION);
    assert!(DEFAULT_TARGET_PRECISION <= MAX_GEOHASH_PRECISION);
    assert!(MIN_MAX_CORRECTIONS <= DEFAULT_MAX_CORRECTIONS);
    assert!(DEFAULT_MAX_CORRECTIONS <= MAX_MAX_CORRECTIONS);
    assert!(MIN_FETCH_TIMEOUT_SECS <= DEFAULT_FETCH_TIMEOUT_SECS);
    assert!(DEFAULT_FETCH_TIMEOUT_SECS <= MAX_FETCH_TIMEOUT_SECS);
    assert!(MAX_PHOTO_BYTES > DEFAULT_MIN_EXIF_BYTES as u64);
    assert!(CLOSE_MATCH_METERS < NEAR_DISTANCE_METERS);
    assert!(NEAR_DISTANCE_METERS < MEDIUM_DISTANCE_METERS);
    assert!(MEDIUM_DISTANCE_METERS < FAR_DISTANCE_METERS);
};
