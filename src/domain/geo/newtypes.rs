// SPDX-License-Identifier: MPL-2.0
//! Pipeline newtypes.
//!
//! This module provides type-safe wrappers for pipeline settings,
//! ensuring they are always within valid ranges.

use crate::config::{
    DEFAULT_MAX_CORRECTIONS, DEFAULT_PRECISION_THRESHOLD, DEFAULT_TARGET_PRECISION,
    MAX_GEOHASH_PRECISION, MAX_MAX_CORRECTIONS, MIN_GEOHASH_PRECISION, MIN_MAX_CORRECTIONS,
};

// =============================================================================
// GeohashPrecision
// =============================================================================

/// Geohash length used as a pipeline threshold or target.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the codec range (1–12 characters).
///
/// # Example
///
/// ```
/// use geotag_lens::domain::geo::GeohashPrecision;
///
/// let precision = GeohashPrecision::new(8);
/// assert_eq!(precision.value(), 8);
///
/// // Values outside range are clamped
/// assert_eq!(GeohashPrecision::new(0).value(), 1);
/// assert_eq!(GeohashPrecision::new(40).value(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeohashPrecision(u8);

impl GeohashPrecision {
    /// Creates a new precision, clamping to the valid range.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(MIN_GEOHASH_PRECISION, MAX_GEOHASH_PRECISION))
    }

    /// Default threshold below which stored markers are considered imprecise.
    #[must_use]
    pub fn default_threshold() -> Self {
        Self(DEFAULT_PRECISION_THRESHOLD)
    }

    /// Returns the value as u8.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns true if this is the minimum value.
    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_GEOHASH_PRECISION
    }

    /// Returns true if this is the maximum value.
    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_GEOHASH_PRECISION
    }
}

/// Defaults to the target precision of a correction run.
impl Default for GeohashPrecision {
    fn default() -> Self {
        Self(DEFAULT_TARGET_PRECISION)
    }
}

// =============================================================================
// MaxCorrections
// =============================================================================

/// Maximum number of markers processed by one batch correction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxCorrections(usize);

impl MaxCorrections {
    /// Creates a new limit, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_MAX_CORRECTIONS, MAX_MAX_CORRECTIONS))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for MaxCorrections {
    fn default() -> Self {
        Self(DEFAULT_MAX_CORRECTIONS)
    }
}

// =============================================================================
// Tests
// =============================================================================
