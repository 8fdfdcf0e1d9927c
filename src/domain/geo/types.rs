// SPDX-License-Identifier: MPL-2.0
//! Geographic coordinate value type and distance helpers.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Approximate length of one degree of latitude, in meters.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

// =============================================================================
// GeoCoordinate
// =============================================================================

/// Coordinate in decimal degrees (WGS84).
///
/// Unlike a clamped GPS reading, this type keeps whatever values it was
/// given: the validator needs to see out-of-range or swapped axes to report
/// them. Use [`GeoCoordinate::checked`] when only valid values are acceptable.
///
/// # Example
///
/// ```
/// use geotag_lens::domain::geo::GeoCoordinate;
///
/// let utrecht = GeoCoordinate::new(52.0907, 5.1214);
/// assert!(utrecht.is_in_range());
/// assert_eq!(utrecht.format(), "52.090700° N, 5.121400° E");
///
/// assert!(GeoCoordinate::checked(95.0, 40.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude in decimal degrees (-90.0 to 90.0 when valid)
    latitude: f64,
    /// Longitude in decimal degrees (-180.0 to 180.0 when valid)
    longitude: f64,
}

impl GeoCoordinate {
    /// Creates a coordinate without range checks.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate only if both axes are finite and within range.
    #[must_use]
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let coord = Self::new(latitude, longitude);
        coord.is_in_range().then_some(coord)
    }

    /// Returns the latitude in decimal degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns whether the latitude is finite and within [-90, 90].
    #[must_use]
    pub fn latitude_in_range(&self) -> bool {
        self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Returns whether the longitude is finite and within [-180, 180].
    #[must_use]
    pub fn longitude_in_range(&self) -> bool {
        self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns whether both axes are within range.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        self.latitude_in_range() && self.longitude_in_range()
    }

    /// Returns whether this is exactly the null island (0,0), which almost
    /// always indicates a GPS or parsing error.
    #[must_use]
    pub fn is_null_island(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Returns the coordinate with latitude and longitude exchanged.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self::new(self.longitude, self.latitude)
    }

    /// Great-circle distance to `other`, in meters.
    #[must_use]
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        haversine_distance(self, other)
    }

    /// Formats the coordinates as a human-readable string.
    ///
    /// Format: "48.856600° N, 2.352200° E"
    #[must_use]
    pub fn format(&self) -> String {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        format!(
            "{:.6}° {}, {:.6}° {}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}

/// Haversine great-circle distance between two coordinates, in meters.
#[must_use]
pub fn haversine_distance(a: &GeoCoordinate, b: &GeoCoordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

// =============================================================================
// Tests
// =============================================================================
